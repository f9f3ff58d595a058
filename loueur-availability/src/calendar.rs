use chrono::{Datelike, Days, Months, NaiveDate};
use loueur_catalog::SeasonCalendar;
use loueur_shared::DateRange;
use serde::Serialize;
use tracing::{debug, warn};

use crate::constraints::{is_selectable, validate_range, BookingConstraints, RangeRejection};
use crate::index::AvailabilityIndex;
use crate::models::{Slot, SlotStatus};

/// Six Sunday-first weeks
pub const GRID_CELLS: usize = 42;

/// Two-click range selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoSelection,
    AnchorSet(NaiveDate),
}

/// What a click on a calendar day did
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The day is not selectable; nothing changed
    Ignored,
    AnchorSet(NaiveDate),
    /// A validated range, for the host to start a booking with
    Selected(DateRange),
    /// The range was refused and the anchor dropped
    Rejected(RangeRejection),
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub slot: Slot,
    pub in_displayed_month: bool,
    pub is_today: bool,
    pub is_selectable: bool,
    pub is_selected: bool,
    pub is_anchor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarStats {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub peak: usize,
    /// Reserved share of the grid, in whole percent
    pub occupancy_rate: u32,
}

/// Month-grid view model over an equipment's availability
#[derive(Debug, Clone)]
pub struct AvailabilityCalendar {
    equipment_id: String,
    index: AvailabilityIndex,
    constraints: Option<BookingConstraints>,
    today: NaiveDate,
    month_start: NaiveDate,
    selection: SelectionState,
    selected_range: Option<DateRange>,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl AvailabilityCalendar {
    pub fn new(
        equipment_id: impl Into<String>,
        base_price: f64,
        peak_price: f64,
        availability: Vec<Slot>,
        constraints: Option<BookingConstraints>,
        today: NaiveDate,
    ) -> Self {
        let index = AvailabilityIndex::new(availability, base_price, peak_price);
        Self::from_index(equipment_id, index, constraints, today)
    }

    pub fn with_season(
        equipment_id: impl Into<String>,
        base_price: f64,
        peak_price: f64,
        availability: Vec<Slot>,
        season: SeasonCalendar,
        constraints: Option<BookingConstraints>,
        today: NaiveDate,
    ) -> Self {
        let index = AvailabilityIndex::with_season(availability, base_price, peak_price, season);
        Self::from_index(equipment_id, index, constraints, today)
    }

    pub fn from_index(
        equipment_id: impl Into<String>,
        index: AvailabilityIndex,
        constraints: Option<BookingConstraints>,
        today: NaiveDate,
    ) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            index,
            constraints,
            today,
            month_start: first_of_month(today),
            selection: SelectionState::NoSelection,
            selected_range: None,
        }
    }

    pub fn equipment_id(&self) -> &str {
        &self.equipment_id
    }

    pub fn index(&self) -> &AvailabilityIndex {
        &self.index
    }

    pub fn constraints(&self) -> Option<&BookingConstraints> {
        self.constraints.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// `(year, month)` of the displayed month, month 1-based
    pub fn displayed_month(&self) -> (i32, u32) {
        (self.month_start.year(), self.month_start.month())
    }

    /// Jump to a month. Refused when the month or its 42-cell grid falls
    /// outside the representable dates.
    pub fn show_month(&mut self, year: i32, month: u32) -> bool {
        match NaiveDate::from_ymd_opt(year, month, 1).filter(|start| Self::grid_start(*start).is_some()) {
            Some(start) => {
                self.month_start = start;
                true
            }
            None => false,
        }
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self
            .month_start
            .checked_add_months(Months::new(1))
            .filter(|next| Self::grid_start(*next).is_some())
        {
            self.month_start = next;
        }
    }

    pub fn prev_month(&mut self) {
        if let Some(prev) = self
            .month_start
            .checked_sub_months(Months::new(1))
            .filter(|prev| Self::grid_start(*prev).is_some())
        {
            self.month_start = prev;
        }
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn selected_range(&self) -> Option<DateRange> {
        self.selected_range
    }

    /// Highlight a range chosen elsewhere (e.g. typed into the booking form)
    pub fn set_selected_range(&mut self, range: Option<DateRange>) {
        self.selected_range = range;
    }

    pub fn slot(&self, date: NaiveDate) -> Slot {
        self.index.resolve(date)
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        is_selectable(date, &self.index.resolve(date), self.constraints.as_ref(), self.today)
    }

    fn cell(&self, date: NaiveDate) -> CalendarCell {
        let slot = self.index.resolve(date);
        CalendarCell {
            date,
            in_displayed_month: date.year() == self.month_start.year() && date.month() == self.month_start.month(),
            is_today: date == self.today,
            is_selectable: is_selectable(date, &slot, self.constraints.as_ref(), self.today),
            is_selected: self.selected_range.is_some_and(|r| r.contains(date)),
            is_anchor: self.selection == SelectionState::AnchorSet(date),
            slot,
        }
    }

    /// Days past the last representable date are left out
    fn cells_from(&self, first: NaiveDate, count: u64) -> Vec<CalendarCell> {
        (0..count)
            .map_while(|offset| first.checked_add_days(Days::new(offset)))
            .map(|date| self.cell(date))
            .collect()
    }

    fn week_start(date: NaiveDate) -> Option<NaiveDate> {
        date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
    }

    /// First cell of the month's grid, if all 42 cells are valid dates
    fn grid_start(month_start: NaiveDate) -> Option<NaiveDate> {
        let first = Self::week_start(month_start)?;
        first.checked_add_days(Days::new(GRID_CELLS as u64 - 1))?;
        Some(first)
    }

    /// The displayed month padded to 42 cells with the neighbouring months
    pub fn grid(&self) -> Vec<CalendarCell> {
        Self::grid_start(self.month_start).map_or_else(Vec::new, |first| self.cells_from(first, GRID_CELLS as u64))
    }

    /// The Sunday-first week containing `focus`; empty or short at the ends
    /// of the representable dates
    pub fn week(&self, focus: NaiveDate) -> Vec<CalendarCell> {
        Self::week_start(focus).map_or_else(Vec::new, |first| self.cells_from(first, 7))
    }

    pub fn stats(&self) -> CalendarStats {
        let grid = self.grid();
        let count = |status: SlotStatus| grid.iter().filter(|c| c.slot.status() == status).count();

        let total = grid.len();
        let reserved = count(SlotStatus::Reserved);
        let occupancy = if total == 0 {
            0.0
        } else {
            (reserved as f64 / total as f64 * 100.0).round()
        };

        CalendarStats {
            total,
            available: count(SlotStatus::Available),
            reserved,
            peak: count(SlotStatus::PeakSeason),
            occupancy_rate: occupancy as u32,
        }
    }

    /// Feed one click into the two-click selection.
    ///
    /// A rejected range is not clamped or corrected; the anchor is dropped and
    /// the user starts over.
    pub fn click(&mut self, date: NaiveDate) -> SelectionOutcome {
        if !self.is_selectable(date) {
            debug!(equipment_id = %self.equipment_id, %date, "click on unselectable day ignored");
            return SelectionOutcome::Ignored;
        }

        match self.selection {
            SelectionState::NoSelection => {
                self.selection = SelectionState::AnchorSet(date);
                SelectionOutcome::AnchorSet(date)
            }
            SelectionState::AnchorSet(anchor) => {
                self.selection = SelectionState::NoSelection;
                let candidate = DateRange::spanning(anchor, date);

                match validate_range(
                    candidate.start(),
                    candidate.end(),
                    self.constraints.as_ref(),
                    &self.index,
                    self.today,
                ) {
                    Ok(range) => {
                        debug!(equipment_id = %self.equipment_id, start = %range.start(), end = %range.end(), "range selected");
                        self.selected_range = Some(range);
                        SelectionOutcome::Selected(range)
                    }
                    Err(reason) => {
                        warn!(equipment_id = %self.equipment_id, %reason, "range rejected");
                        SelectionOutcome::Rejected(reason)
                    }
                }
            }
        }
    }

    /// Drop a pending anchor
    pub fn clear_selection(&mut self) {
        self.selection = SelectionState::NoSelection;
    }
}
