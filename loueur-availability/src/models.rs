use chrono::NaiveDate;
use loueur_catalog::PricingTier;
use loueur_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a day can be rented, independent of its price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Reserved,
    Blocked,
    Maintenance,
}

/// Display status of a day, the shape the calendar legend and statistics use.
///
/// Derived from [`Availability`] and [`PricingTier`]: an unavailable state
/// always wins, and `PeakSeason` only ever marks an available day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SlotStatus {
    Available,
    Reserved,
    Blocked,
    Maintenance,
    PeakSeason,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationMeta {
    pub reservation_id: Uuid,
    pub booked_by: Masked<String>,
    pub notes: Option<String>,
}

/// One calendar day of one equipment unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub date: NaiveDate,
    pub availability: Availability,
    pub tier: PricingTier,
    /// `None` means the base or peak rate applies, resolved at read time
    pub price: Option<f64>,
    pub reservation: Option<ReservationMeta>,
}

impl Slot {
    pub fn open(date: NaiveDate, tier: PricingTier, price: Option<f64>) -> Self {
        Self {
            date,
            availability: Availability::Available,
            tier,
            price,
            reservation: None,
        }
    }

    pub fn status(&self) -> SlotStatus {
        match (self.availability, self.tier) {
            (Availability::Reserved, _) => SlotStatus::Reserved,
            (Availability::Blocked, _) => SlotStatus::Blocked,
            (Availability::Maintenance, _) => SlotStatus::Maintenance,
            (Availability::Available, PricingTier::Peak) => SlotStatus::PeakSeason,
            (Availability::Available, PricingTier::Standard) => SlotStatus::Available,
        }
    }

    /// Reserved, blocked and maintenance days can never be part of a rental
    pub fn is_open(&self) -> bool {
        self.availability == Availability::Available
    }
}
