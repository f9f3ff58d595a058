use chrono::NaiveDate;
use uuid::Uuid;

use crate::pii::Masked;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct HoldPlacedEvent {
    pub hold_id: Uuid,
    pub equipment_id: String,
    pub renter: Masked<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub expires_at: i64,
}

/// Emitted once a booking record has passed the ledger's exclusive commit.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub equipment_id: String,
    pub renter: Masked<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    pub total_price: f64,
    pub deposit: f64,
    pub delivery_address: Option<Masked<String>>,
    pub timestamp: i64,
}
