pub mod models;
pub mod sink;
pub mod wizard;

pub use models::{BookingData, WizardStep};
pub use sink::{BookingSink, SinkError};
pub use wizard::{BookingWizard, DateGate, WizardError};
