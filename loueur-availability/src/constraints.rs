use chrono::{Days, NaiveDate};
use loueur_catalog::EquipmentCategory;
use loueur_shared::DateRange;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::index::AvailabilityIndex;
use crate::models::Slot;

/// Booking policy of an equipment category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingConstraints {
    pub min_days: u32,
    pub max_days: u32,
    pub advance_notice_days: u32,
    #[serde(default)]
    pub blackout_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub maintenance_windows: Vec<DateRange>,
}

impl BookingConstraints {
    /// Harvesters and other heavy machinery
    pub fn heavy_machinery() -> Self {
        Self::policy(7, 120, 5)
    }

    /// Tractors
    pub fn standard() -> Self {
        Self::policy(3, 90, 2)
    }

    /// Everything else
    pub fn premium() -> Self {
        Self::policy(1, 60, 1)
    }

    fn policy(min_days: u32, max_days: u32, advance_notice_days: u32) -> Self {
        Self {
            min_days,
            max_days,
            advance_notice_days,
            blackout_dates: Vec::new(),
            maintenance_windows: Vec::new(),
        }
    }

    pub fn for_category(category: EquipmentCategory) -> Self {
        match category {
            EquipmentCategory::Moissonneuse => Self::heavy_machinery(),
            EquipmentCategory::Tracteur => Self::standard(),
            _ => Self::premium(),
        }
    }

    pub fn with_blackout_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.blackout_dates.extend(dates);
        self
    }

    pub fn with_maintenance_window(mut self, window: DateRange) -> Self {
        self.maintenance_windows.push(window);
        self
    }

    /// First date that satisfies the advance notice, `None` past the last
    /// representable date
    pub fn earliest_start(&self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_days(Days::new(u64::from(self.advance_notice_days)))
    }

    fn is_blacked_out(&self, date: NaiveDate) -> bool {
        self.blackout_dates.contains(&date)
    }

    fn in_maintenance_window(&self, date: NaiveDate) -> bool {
        self.maintenance_windows.iter().any(|w| w.contains(date))
    }
}

/// Category-keyed policy lookup by category name; unknown names get the
/// premium policy.
pub fn constraints_for_category(category: &str) -> BookingConstraints {
    category
        .parse::<EquipmentCategory>()
        .map_or_else(|_| BookingConstraints::premium(), BookingConstraints::for_category)
}

/// Why a candidate range was refused. Always recoverable: the user picks a
/// new range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeRejection {
    #[error("Minimum rental period is {min_days} days")]
    TooShort { days: u32, min_days: u32 },

    #[error("Maximum rental period is {max_days} days")]
    TooLong { days: u32, max_days: u32 },

    #[error("Selected range contains unavailable dates")]
    ContainsUnavailable { date: NaiveDate },

    #[error("End date must not be before start date")]
    Inverted,
}

/// Whether a single day may be part of a rental
pub fn is_selectable(
    date: NaiveDate,
    slot: &Slot,
    constraints: Option<&BookingConstraints>,
    today: NaiveDate,
) -> bool {
    if !slot.is_open() || date < today {
        return false;
    }
    match constraints {
        Some(c) => {
            c.earliest_start(today).is_some_and(|earliest| date >= earliest)
                && !c.is_blacked_out(date)
                && !c.in_maintenance_window(date)
        }
        None => true,
    }
}

/// Check a candidate range: ordering, length bounds, then every day.
pub fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    constraints: Option<&BookingConstraints>,
    index: &AvailabilityIndex,
    today: NaiveDate,
) -> Result<DateRange, RangeRejection> {
    let range = DateRange::ordered(start, end).ok_or(RangeRejection::Inverted)?;
    let days = range.days();

    if let Some(c) = constraints {
        if days < c.min_days {
            return Err(RangeRejection::TooShort { days, min_days: c.min_days });
        }
        if days > c.max_days {
            return Err(RangeRejection::TooLong { days, max_days: c.max_days });
        }
    }

    if let Some(date) = range
        .iter_days()
        .find(|d| !is_selectable(*d, &index.resolve(*d), constraints, today))
    {
        debug!(%start, %end, %date, "range crosses an unavailable date");
        return Err(RangeRejection::ContainsUnavailable { date });
    }

    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;
    use loueur_catalog::PricingTier;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 19)
    }

    fn open_index() -> AvailabilityIndex {
        AvailabilityIndex::new(Vec::new(), 450.0, 562.5)
    }

    fn index_with(date: NaiveDate, availability: Availability) -> AvailabilityIndex {
        let mut slot = Slot::open(date, PricingTier::Standard, None);
        slot.availability = availability;
        AvailabilityIndex::new(vec![slot], 450.0, 562.5)
    }

    #[test]
    fn test_category_policies() {
        assert_eq!(constraints_for_category("Moissonneuse"), BookingConstraints::policy(7, 120, 5));
        assert_eq!(constraints_for_category("Tracteur"), BookingConstraints::policy(3, 90, 2));
        assert_eq!(constraints_for_category("Drone"), BookingConstraints::policy(1, 60, 1));
        assert_eq!(constraints_for_category("Bulldozer"), BookingConstraints::premium());
    }

    #[test]
    fn test_single_date_rules() {
        let c = BookingConstraints::standard().with_blackout_dates([date(2026, 12, 25)]);
        let index = open_index();
        let check = |d: NaiveDate| is_selectable(d, &index.resolve(d), Some(&c), today());

        assert!(!check(date(2026, 10, 18)), "past");
        assert!(!check(date(2026, 10, 20)), "inside notice");
        assert!(check(date(2026, 10, 21)), "notice satisfied");
        assert!(!check(date(2026, 12, 25)), "blackout");
        assert!(check(date(2026, 12, 26)));

        // Without constraints only the past and the slot state matter
        assert!(is_selectable(today(), &index.resolve(today()), None, today()));
    }

    #[test]
    fn test_notice_past_last_date_is_never_satisfied() {
        let c = BookingConstraints::standard();
        let last = NaiveDate::MAX;
        assert_eq!(c.earliest_start(last), None);
        assert!(!is_selectable(last, &open_index().resolve(last), Some(&c), last));
    }

    #[test]
    fn test_unavailable_states_never_selectable() {
        let d = date(2026, 11, 10);
        for availability in [Availability::Reserved, Availability::Blocked, Availability::Maintenance] {
            let index = index_with(d, availability);
            assert!(!is_selectable(d, &index.resolve(d), None, today()));
        }
    }

    #[test]
    fn test_declared_maintenance_window_blocks_days() {
        let window = DateRange::spanning(date(2026, 11, 3), date(2026, 11, 6));
        let c = BookingConstraints::premium().with_maintenance_window(window);
        let index = open_index();

        let err = validate_range(date(2026, 11, 1), date(2026, 11, 4), Some(&c), &index, today()).unwrap_err();
        assert_eq!(err, RangeRejection::ContainsUnavailable { date: date(2026, 11, 3) });
        assert!(validate_range(date(2026, 11, 7), date(2026, 11, 9), Some(&c), &index, today()).is_ok());
    }

    #[test]
    fn test_inverted_maintenance_window_not_loadable() {
        let json = r#"{
            "min_days": 1, "max_days": 60, "advance_notice_days": 1,
            "maintenance_windows": [{"start": "2026-11-06", "end": "2026-11-03"}]
        }"#;
        assert!(serde_json::from_str::<BookingConstraints>(json).is_err());

        let fixed = json.replace("2026-11-06", "2026-11-01");
        let c: BookingConstraints = serde_json::from_str(&fixed).unwrap();
        assert_eq!(c.maintenance_windows[0].days(), 3);
    }

    #[test]
    fn test_length_bounds_inclusive() {
        let c = BookingConstraints::standard();
        let index = open_index();

        let err = validate_range(date(2026, 11, 2), date(2026, 11, 3), Some(&c), &index, today()).unwrap_err();
        assert_eq!(err, RangeRejection::TooShort { days: 2, min_days: 3 });
        assert_eq!(err.to_string(), "Minimum rental period is 3 days");

        assert_eq!(
            validate_range(date(2026, 11, 2), date(2026, 11, 4), Some(&c), &index, today()).unwrap().days(),
            3
        );

        let err = validate_range(date(2026, 11, 2), date(2027, 1, 31), Some(&c), &index, today()).unwrap_err();
        assert_eq!(err, RangeRejection::TooLong { days: 91, max_days: 90 });
    }

    #[test]
    fn test_one_bad_day_invalidates_range() {
        let index = index_with(date(2026, 11, 12), Availability::Reserved);
        let err = validate_range(date(2026, 11, 10), date(2026, 11, 14), None, &index, today()).unwrap_err();
        assert_eq!(err, RangeRejection::ContainsUnavailable { date: date(2026, 11, 12) });
    }

    #[test]
    fn test_start_inside_notice_rejected() {
        let c = BookingConstraints::policy(1, 60, 5);
        let index = open_index();
        let tomorrow = date(2026, 10, 20);

        let err = validate_range(tomorrow, date(2026, 10, 30), Some(&c), &index, today()).unwrap_err();
        assert_eq!(err, RangeRejection::ContainsUnavailable { date: tomorrow });
    }

    #[test]
    fn test_inverted_range() {
        let err = validate_range(date(2026, 11, 5), date(2026, 11, 1), None, &open_index(), today()).unwrap_err();
        assert_eq!(err, RangeRejection::Inverted);
    }

    #[test]
    fn test_monotonic_in_constraints() {
        let index = open_index();
        let start = date(2026, 11, 2);
        let ranges: Vec<NaiveDate> = (0..40).map(|n| start + Days::new(n)).collect();

        let tight = BookingConstraints::policy(5, 20, 10);
        let loose = BookingConstraints::policy(2, 30, 3);

        for end in ranges {
            let tight_ok = validate_range(start, end, Some(&tight), &index, today()).is_ok();
            let loose_ok = validate_range(start, end, Some(&loose), &index, today()).is_ok();
            if tight_ok {
                assert!(loose_ok, "loosening rejected {start}..{end}");
            }
        }
    }
}
