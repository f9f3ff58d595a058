pub mod events;
pub mod range;
