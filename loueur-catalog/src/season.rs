use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Pricing dimension of a calendar day, independent of its availability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    Standard,
    Peak,
}

/// Fixed set of high-demand months (1 = January)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonCalendar {
    peak_months: Vec<u32>,
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        // Planting (March-May) and harvest (September-November)
        Self::new(vec![3, 4, 5, 9, 10, 11])
    }
}

impl SeasonCalendar {
    pub fn new(peak_months: Vec<u32>) -> Self {
        Self { peak_months }
    }

    pub fn peak_months(&self) -> &[u32] {
        &self.peak_months
    }

    pub fn is_peak(&self, date: NaiveDate) -> bool {
        self.peak_months.contains(&date.month())
    }

    pub fn tier_for(&self, date: NaiveDate) -> PricingTier {
        if self.is_peak(date) {
            PricingTier::Peak
        } else {
            PricingTier::Standard
        }
    }
}
