use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Equipment categories of the rental marketplace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EquipmentCategory {
    Tracteur,
    Couveuse,
    Remorque,
    Scie,
    #[serde(rename = "Pulvérisateur")]
    Pulverisateur,
    Outil,
    Moissonneuse,
    Semoir,
    Drone,
    Autre,
}

impl EquipmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tracteur => "Tracteur",
            Self::Couveuse => "Couveuse",
            Self::Remorque => "Remorque",
            Self::Scie => "Scie",
            Self::Pulverisateur => "Pulvérisateur",
            Self::Outil => "Outil",
            Self::Moissonneuse => "Moissonneuse",
            Self::Semoir => "Semoir",
            Self::Drone => "Drone",
            Self::Autre => "Autre",
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "Tracteur" => Self::Tracteur,
            "Couveuse" => Self::Couveuse,
            "Remorque" => Self::Remorque,
            "Scie" => Self::Scie,
            "Pulvérisateur" | "Pulverisateur" => Self::Pulverisateur,
            "Outil" => Self::Outil,
            "Moissonneuse" => Self::Moissonneuse,
            "Semoir" => Self::Semoir,
            "Drone" => Self::Drone,
            "Autre" => Self::Autre,
            other => return Err(CatalogError::InvalidCategory(other.to_string())),
        };
        Ok(category)
    }
}

/// Seasonal per-day rates set by the owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DynamicPricing {
    pub peak: f64,
    pub off_peak: f64,
    pub weekend: f64,
}

/// A rentable piece of equipment and its rate table.
///
/// Weekly and monthly rates are optional flat amounts; when absent the
/// pricing engine derives them from the per-day rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub category: EquipmentCategory,
    pub price_per_day: f64,
    pub price_per_week: Option<f64>,
    pub price_per_month: Option<f64>,
    pub dynamic_pricing: Option<DynamicPricing>,
}

impl Equipment {
    /// Per-day rate for a season. Without owner-set dynamic pricing the peak
    /// rate is the daily rate scaled by `peak_multiplier`.
    pub fn seasonal_rate(&self, peak: bool, peak_multiplier: f64) -> f64 {
        match (&self.dynamic_pricing, peak) {
            (Some(dp), true) => dp.peak,
            (Some(dp), false) => dp.off_peak,
            (None, true) => self.price_per_day * peak_multiplier,
            (None, false) => self.price_per_day,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Equipment not found: {0}")]
    NotFound(String),

    #[error("Unknown equipment category: {0}")]
    InvalidCategory(String),

    #[error("Unknown extra: {0}")]
    UnknownExtra(String),
}
