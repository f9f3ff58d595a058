pub mod models;
pub mod pii;

pub use models::events::{BookingConfirmedEvent, HoldPlacedEvent};
pub use models::range::{DateRange, InvertedRange};
pub use pii::Masked;
