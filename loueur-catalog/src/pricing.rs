use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equipment::Equipment;
use crate::extras::ReservationExtra;
use crate::season::{PricingTier, SeasonCalendar};

/// Tunables of the rental pricing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// High-demand months, 1 = January
    pub peak_months: Vec<u32>,

    /// Rentals at least this long are priced at the weekly tier
    pub weekly_threshold_days: u32,

    /// Rentals at least this long are priced at the monthly tier
    pub monthly_threshold_days: u32,

    /// Factor applied to `rate × days` when no flat weekly rate is set
    pub weekly_discount: f64,

    /// Factor applied to `rate × days` when no flat monthly rate is set
    pub monthly_discount: f64,

    /// Share of the total held as deposit
    pub deposit_rate: f64,

    /// Peak uplift on the daily rate for equipment without dynamic pricing
    pub peak_multiplier: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            peak_months: SeasonCalendar::default().peak_months().to_vec(),
            weekly_threshold_days: 7,
            monthly_threshold_days: 30,
            weekly_discount: 0.90,
            monthly_discount: 0.75,
            deposit_rate: 0.20,
            peak_multiplier: 1.25,
        }
    }
}

impl PricingConfig {
    pub fn season(&self) -> SeasonCalendar {
        SeasonCalendar::new(self.peak_months.clone())
    }
}

/// Duration tier a rental is priced at. Exactly one applies per rental.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateTier {
    Daily,
    Weekly,
    Monthly,
}

/// Base rental cost and how it was derived
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BaseQuote {
    pub season: PricingTier,
    pub per_day_rate: f64,
    pub rate_tier: RateTier,
    /// A flat weekly/monthly rate from the rate table was used as-is
    pub flat_rate: bool,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub total: f64,
    pub deposit: f64,
}

/// Every monetary figure of a booking, derived in one pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub days: u32,
    pub base: BaseQuote,
    pub base_price: f64,
    pub extras_total: f64,
    pub total: f64,
    pub deposit: f64,
}

/// Rental pricing engine.
///
/// Holds configuration only; every figure is recomputed from its inputs on
/// each call.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
    season: SeasonCalendar,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        let season = config.season();
        Self { config, season }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn season(&self) -> &SeasonCalendar {
        &self.season
    }

    /// Per-day rate for the whole stay. Only the month of `start` matters.
    pub fn seasonal_rate(&self, equipment: &Equipment, start: NaiveDate) -> (PricingTier, f64) {
        let tier = self.season.tier_for(start);
        let rate = equipment.seasonal_rate(tier == PricingTier::Peak, self.config.peak_multiplier);
        (tier, rate)
    }

    /// Base rental cost with its derivation
    pub fn quote_base(&self, equipment: &Equipment, start: NaiveDate, days: u32) -> BaseQuote {
        let (season, per_day_rate) = self.seasonal_rate(equipment, start);
        let raw = per_day_rate * f64::from(days);

        let (rate_tier, flat, amount) = if days == 0 {
            (RateTier::Daily, None, 0.0)
        } else if days >= self.config.monthly_threshold_days {
            let flat = equipment.price_per_month;
            (RateTier::Monthly, flat, flat.unwrap_or(raw * self.config.monthly_discount))
        } else if days >= self.config.weekly_threshold_days {
            let flat = equipment.price_per_week;
            (RateTier::Weekly, flat, flat.unwrap_or(raw * self.config.weekly_discount))
        } else {
            (RateTier::Daily, None, raw)
        };

        BaseQuote {
            season,
            per_day_rate,
            rate_tier,
            flat_rate: flat.is_some(),
            amount,
        }
    }

    pub fn compute_base_price(&self, equipment: &Equipment, start: NaiveDate, days: u32) -> f64 {
        self.quote_base(equipment, start, days).amount
    }

    /// Extras share the rental's day count
    pub fn compute_extras_total<'a, I>(&self, extras: I, days: u32) -> f64
    where
        I: IntoIterator<Item = &'a ReservationExtra>,
    {
        extras
            .into_iter()
            .map(|extra| extra.price * f64::from(days))
            .sum()
    }

    /// Total is left unrounded; the deposit is rounded to the currency unit
    pub fn compute_totals(&self, base_price: f64, extras_total: f64) -> Totals {
        let total = base_price + extras_total;
        Totals {
            total,
            deposit: (total * self.config.deposit_rate).round(),
        }
    }

    /// The full pipeline: base, extras, total, deposit
    pub fn price<'a, I>(
        &self,
        equipment: &Equipment,
        start: NaiveDate,
        days: u32,
        extras: I,
    ) -> PriceBreakdown
    where
        I: IntoIterator<Item = &'a ReservationExtra>,
    {
        let base = self.quote_base(equipment, start, days);
        let extras_total = self.compute_extras_total(extras, days);
        let totals = self.compute_totals(base.amount, extras_total);

        debug!(
            equipment_id = %equipment.id,
            %start,
            days,
            tier = ?base.rate_tier,
            total = totals.total,
            "priced rental"
        );

        PriceBreakdown {
            days,
            base,
            base_price: base.amount,
            extras_total,
            total: totals.total,
            deposit: totals.deposit,
        }
    }
}
