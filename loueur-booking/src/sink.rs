use crate::models::BookingData;

pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receiver of completed bookings (confirmation, persistence, ledger commit).
///
/// An error leaves the wizard on its review step with all data intact.
pub trait BookingSink {
    fn submit(&mut self, booking: &BookingData) -> Result<(), SinkError>;
}

/// Collects every submitted booking, accepting all of them
impl BookingSink for Vec<BookingData> {
    fn submit(&mut self, booking: &BookingData) -> Result<(), SinkError> {
        self.push(booking.clone());
        Ok(())
    }
}
