use chrono::NaiveDate;
use loueur_availability::{validate_range, AvailabilityIndex, BookingConstraints, RangeRejection};
use loueur_catalog::{Equipment, ExtrasCatalog, PriceBreakdown, PricingEngine, ReservationExtra};
use loueur_shared::{DateRange, Masked};
use tracing::{info, warn};

use crate::models::{BookingData, WizardStep};
use crate::sink::{BookingSink, SinkError};

/// Availability and policy the wizard checks typed-in dates against
#[derive(Debug, Clone)]
pub struct DateGate {
    pub index: AvailabilityIndex,
    pub constraints: Option<BookingConstraints>,
    pub today: NaiveDate,
}

impl DateGate {
    fn check(&self, start: NaiveDate, end: NaiveDate) -> Result<DateRange, RangeRejection> {
        validate_range(start, end, self.constraints.as_ref(), &self.index, self.today)
    }
}

/// Three-step booking flow for one equipment unit: dates, options, review.
///
/// Prices are never stored; every quote and the final record are derived
/// from the current dates and extras selection.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    equipment: Equipment,
    pricing: PricingEngine,
    catalog: ExtrasCatalog,
    gate: Option<DateGate>,
    step: WizardStep,
    dates: Option<DateRange>,
    selected_extras: Vec<String>,
    delivery_address: Masked<String>,
    notes: String,
}

impl BookingWizard {
    pub fn new(equipment: Equipment, pricing: PricingEngine) -> Self {
        Self {
            equipment,
            pricing,
            catalog: ExtrasCatalog::standard(),
            gate: None,
            step: WizardStep::Dates,
            dates: None,
            selected_extras: Vec::new(),
            delivery_address: Masked(String::new()),
            notes: String::new(),
        }
    }

    pub fn with_catalog(mut self, catalog: ExtrasCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Validate dates against availability and category policy as well
    pub fn with_gate(mut self, gate: DateGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn catalog(&self) -> &ExtrasCatalog {
        &self.catalog
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn dates(&self) -> Option<DateRange> {
        self.dates
    }

    pub fn days(&self) -> u32 {
        self.dates.map_or(0, |r| r.days())
    }

    /// Set the rental period. A rejected period leaves the previous one in
    /// place.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<DateRange, WizardError> {
        let range = self.check_dates(start, end).map_err(|reason| {
            warn!(equipment_id = %self.equipment.id, %start, %end, %reason, "dates rejected");
            WizardError::Rejected(reason)
        })?;
        self.dates = Some(range);
        Ok(range)
    }

    pub fn clear_dates(&mut self) {
        self.dates = None;
    }

    fn check_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<DateRange, RangeRejection> {
        match &self.gate {
            Some(gate) => gate.check(start, end),
            None => DateRange::ordered(start, end).ok_or(RangeRejection::Inverted),
        }
    }

    /// The step-1 guard, re-run on every forward move
    fn checked_dates(&self) -> Result<DateRange, WizardError> {
        let range = self.dates.ok_or(WizardError::DatesRequired)?;
        let range = self
            .check_dates(range.start(), range.end())
            .map_err(WizardError::Rejected)?;
        if range.days() == 0 {
            return Err(WizardError::DatesRequired);
        }
        Ok(range)
    }

    /// Toggle an extra; returns whether it is now selected
    pub fn toggle_extra(&mut self, extra_id: &str) -> Result<bool, WizardError> {
        if !self.catalog.contains(extra_id) {
            return Err(WizardError::UnknownExtra(extra_id.to_string()));
        }
        if let Some(pos) = self.selected_extras.iter().position(|id| id == extra_id) {
            self.selected_extras.remove(pos);
            Ok(false)
        } else {
            self.selected_extras.push(extra_id.to_string());
            Ok(true)
        }
    }

    pub fn is_extra_selected(&self, extra_id: &str) -> bool {
        self.selected_extras.iter().any(|id| id == extra_id)
    }

    pub fn selected_extras(&self) -> Vec<ReservationExtra> {
        self.catalog.selected(&self.selected_extras)
    }

    pub fn set_delivery_address(&mut self, address: impl Into<String>) {
        self.delivery_address = Masked(address.into());
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Live price for the current inputs, `None` until dates are set
    pub fn quote(&self) -> Option<PriceBreakdown> {
        let range = self.dates?;
        let extras = self.selected_extras();
        Some(self.pricing.price(&self.equipment, range.start(), range.days(), &extras))
    }

    /// Transition: Dates → Options (valid dates required), Options → Review
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let to = match self.step {
            WizardStep::Dates => {
                self.checked_dates()?;
                WizardStep::Options
            }
            WizardStep::Options => WizardStep::Review,
            WizardStep::Review => {
                return Err(WizardError::InvalidTransition {
                    from: WizardStep::Review,
                    to: "next",
                })
            }
        };
        info!(equipment_id = %self.equipment.id, from = ?self.step, to = ?to, "wizard advanced");
        self.step = to;
        Ok(to)
    }

    /// Step back; always allowed, keeps everything entered so far
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Dates | WizardStep::Options => WizardStep::Dates,
            WizardStep::Review => WizardStep::Options,
        };
        self.step
    }

    /// Abort from any step. Nothing was handed out, so nothing to undo.
    pub fn cancel(&mut self) {
        info!(equipment_id = %self.equipment.id, step = ?self.step, "booking cancelled");
        self.reset();
    }

    fn reset(&mut self) {
        self.step = WizardStep::Dates;
        self.dates = None;
        self.selected_extras.clear();
        self.delivery_address.0.clear();
        self.notes.clear();
    }

    fn non_empty(value: &str) -> Option<String> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// The record `complete` would emit right now
    pub fn assemble(&self) -> Result<BookingData, WizardError> {
        let range = self.checked_dates()?;
        let extras = self.selected_extras();
        let price = self.pricing.price(&self.equipment, range.start(), range.days(), &extras);

        Ok(BookingData {
            equipment_id: self.equipment.id.clone(),
            start_date: range.start(),
            end_date: range.end(),
            days: range.days(),
            base_price: price.base_price,
            extras,
            total_price: price.total,
            deposit: price.deposit,
            delivery_address: Self::non_empty(self.delivery_address.expose()).map(Masked),
            notes: Self::non_empty(&self.notes),
        })
    }

    /// Finish from the review step: build the record, hand it to `sink`, and
    /// clear the wizard. If the sink refuses it the wizard stays on review.
    pub fn complete<S>(&mut self, sink: &mut S) -> Result<BookingData, WizardError>
    where
        S: BookingSink + ?Sized,
    {
        if self.step != WizardStep::Review {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                to: "complete",
            });
        }

        let booking = self.assemble()?;
        sink.submit(&booking).map_err(|e| {
            warn!(equipment_id = %booking.equipment_id, error = %e, "booking refused by sink");
            WizardError::Sink(e)
        })?;

        info!(
            equipment_id = %booking.equipment_id,
            start = %booking.start_date,
            end = %booking.end_date,
            total = booking.total_price,
            deposit = booking.deposit,
            "booking completed"
        );
        self.reset();
        Ok(booking)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Choose a rental period first")]
    DatesRequired,

    #[error("{0}")]
    Rejected(RangeRejection),

    #[error("Invalid wizard transition from {from:?} ({to})")]
    InvalidTransition { from: WizardStep, to: &'static str },

    #[error("Unknown extra: {0}")]
    UnknownExtra(String),

    #[error("Booking was not accepted: {0}")]
    Sink(SinkError),
}
