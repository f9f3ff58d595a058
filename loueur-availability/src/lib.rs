pub mod calendar;
pub mod constraints;
pub mod generator;
pub mod index;
pub mod models;

pub use calendar::{AvailabilityCalendar, CalendarCell, CalendarStats, SelectionOutcome, SelectionState};
pub use constraints::{constraints_for_category, is_selectable, validate_range, BookingConstraints, RangeRejection};
pub use generator::{AvailabilityGenerator, GeneratorConfig};
pub use index::AvailabilityIndex;
pub use models::{Availability, ReservationMeta, Slot, SlotStatus};

use chrono::NaiveDate;

/// Anything that can produce the day-indexed slot sequence of an equipment
/// unit, starting at `today`.
pub trait AvailabilitySource {
    fn availability(&self, equipment_id: &str, today: NaiveDate) -> Vec<Slot>;
}
