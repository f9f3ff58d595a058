use loueur_availability::GeneratorConfig;
use loueur_catalog::PricingConfig;
use serde::Deserialize;
use std::env;

use crate::ledger::LedgerConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub pricing: PricingConfig,
    pub availability: GeneratorConfig,
    pub ledger: LedgerConfig,
}

/// `LOUEUR__PRICING__DEPOSIT_RATE=0.3` sets `pricing.deposit_rate`; the
/// separator also follows the prefix
fn environment() -> config::Environment {
    config::Environment::with_prefix("LOUEUR").separator("__")
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Checked-in defaults; the built-in ones apply when it is missing
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        s.try_deserialize()
    }

    /// Defaults overlaid with a single TOML document
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_any_source() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.pricing.peak_months, vec![3, 4, 5, 9, 10, 11]);
        assert_eq!(config.pricing.weekly_threshold_days, 7);
        assert_eq!(config.pricing.monthly_threshold_days, 30);
        assert_eq!(config.pricing.deposit_rate, 0.20);
        assert_eq!(config.availability.horizon_days, 180);
        assert_eq!(config.availability.renters.len(), 5);
        assert_eq!(config.ledger.hold_seconds, 900);
    }

    #[test]
    fn test_environment_keys_use_double_underscore_after_prefix() {
        let vars: config::Map<String, String> = [
            ("LOUEUR__PRICING__DEPOSIT_RATE", "0.3"),
            ("LOUEUR__LEDGER__HOLD_SECONDS", "600"),
            ("LOUEUR_PRICING__WEEKLY_DISCOUNT", "0.5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config: Config = config::Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.pricing.deposit_rate, 0.3);
        assert_eq!(config.ledger.hold_seconds, 600);
        // Single underscore after the prefix is not picked up
        assert_eq!(config.pricing.weekly_discount, 0.90);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [pricing]
            deposit_rate = 0.3
            peak_months = [6, 7, 8]

            [ledger]
            hold_seconds = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.deposit_rate, 0.3);
        assert_eq!(config.pricing.peak_months, vec![6, 7, 8]);
        assert_eq!(config.pricing.weekly_discount, 0.90);
        assert_eq!(config.ledger.hold_seconds, 600);
        assert_eq!(config.availability.reserved_probability, 0.4);
    }
}
