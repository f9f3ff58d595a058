use chrono::NaiveDate;
use loueur_catalog::{PricingTier, SeasonCalendar};
use std::collections::BTreeMap;

use crate::models::Slot;

/// Date-keyed view over a slot sequence.
///
/// The sequence is a sparse overlay: a date without a slot is open, at the
/// peak or base rate depending on its month.
#[derive(Debug, Clone)]
pub struct AvailabilityIndex {
    slots: BTreeMap<NaiveDate, Slot>,
    base_price: f64,
    peak_price: f64,
    season: SeasonCalendar,
}

impl AvailabilityIndex {
    pub fn new(slots: Vec<Slot>, base_price: f64, peak_price: f64) -> Self {
        Self::with_season(slots, base_price, peak_price, SeasonCalendar::default())
    }

    /// Later slots for the same date replace earlier ones
    pub fn with_season(slots: Vec<Slot>, base_price: f64, peak_price: f64, season: SeasonCalendar) -> Self {
        let slots = slots.into_iter().map(|s| (s.date, s)).collect();
        Self {
            slots,
            base_price,
            peak_price,
            season,
        }
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn peak_price(&self) -> f64 {
        self.peak_price
    }

    pub fn season(&self) -> &SeasonCalendar {
        &self.season
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn rate_for(&self, tier: PricingTier) -> f64 {
        match tier {
            PricingTier::Peak => self.peak_price,
            PricingTier::Standard => self.base_price,
        }
    }

    /// The slot for `date`, with its price always filled in
    pub fn resolve(&self, date: NaiveDate) -> Slot {
        match self.slots.get(&date) {
            Some(slot) => {
                let mut slot = slot.clone();
                if slot.price.is_none() {
                    slot.price = Some(self.rate_for(slot.tier));
                }
                slot
            }
            None => {
                let tier = self.season.tier_for(date);
                Slot::open(date, tier, Some(self.rate_for(tier)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, SlotStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_dates_default_by_season() {
        let index = AvailabilityIndex::new(Vec::new(), 450.0, 562.5);

        let january = index.resolve(date(2027, 1, 10));
        assert_eq!(january.status(), SlotStatus::Available);
        assert_eq!(january.price, Some(450.0));

        let october = index.resolve(date(2026, 10, 10));
        assert_eq!(october.status(), SlotStatus::PeakSeason);
        assert_eq!(october.price, Some(562.5));
    }

    #[test]
    fn test_stored_slot_wins_and_price_is_filled() {
        let mut blocked = Slot::open(date(2026, 12, 24), PricingTier::Standard, None);
        blocked.availability = Availability::Blocked;
        let index = AvailabilityIndex::new(vec![blocked], 450.0, 562.5);

        let slot = index.resolve(date(2026, 12, 24));
        assert_eq!(slot.status(), SlotStatus::Blocked);
        assert_eq!(slot.price, Some(450.0));
        assert_eq!(index.len(), 1);
    }
}
