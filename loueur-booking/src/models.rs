use chrono::NaiveDate;
use loueur_catalog::ReservationExtra;
use loueur_shared::Masked;
use serde::{Deserialize, Serialize};

/// Booking wizard steps, strictly linear
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    Dates,
    Options,
    Review,
}

impl WizardStep {
    /// 1-based position, as shown in the progress indicator
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Dates => 1,
            WizardStep::Options => 2,
            WizardStep::Review => 3,
        }
    }
}

/// The finalized booking record handed to the host.
///
/// Built once when the wizard completes and never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingData {
    pub equipment_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    pub base_price: f64,
    pub extras: Vec<ReservationExtra>,
    pub total_price: f64,
    pub deposit: f64,
    pub delivery_address: Option<Masked<String>>,
    pub notes: Option<String>,
}

impl BookingData {
    pub fn extras_total(&self) -> f64 {
        self.total_price - self.base_price
    }
}
