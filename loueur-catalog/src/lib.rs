pub mod equipment;
pub mod extras;
pub mod fleet;
pub mod pricing;
pub mod season;

pub use equipment::{CatalogError, DynamicPricing, Equipment, EquipmentCategory};
pub use extras::{ExtraType, ExtrasCatalog, ReservationExtra};
pub use fleet::{demo_fleet, find_equipment};
pub use pricing::{BaseQuote, PriceBreakdown, PricingConfig, PricingEngine, RateTier, Totals};
pub use season::{PricingTier, SeasonCalendar};
