use chrono::{Days, NaiveDate};
use loueur_catalog::{PricingTier, SeasonCalendar};
use loueur_shared::Masked;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Availability, ReservationMeta, Slot};
use crate::AvailabilitySource;

/// Knobs of the demo availability generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub horizon_days: u32,
    pub reserved_probability: f64,
    /// Overlays only apply strictly after these offsets from today
    pub reserved_after_days: u32,
    pub maintenance_probability: f64,
    pub maintenance_after_days: u32,
    pub blocked_probability: f64,
    pub blocked_after_days: u32,
    pub peak_multiplier: f64,
    pub renters: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            horizon_days: 180,
            reserved_probability: 0.4,
            reserved_after_days: 7,
            maintenance_probability: 0.05,
            maintenance_after_days: 30,
            blocked_probability: 0.02,
            blocked_after_days: 60,
            peak_multiplier: 1.25,
            renters: ["Mamadou Diallo", "Fatou Sow", "Ibrahima Ndiaye", "Aminata Fall", "Ousmane Ba"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Daily base rate of an equipment family, picked by a substring of its id
pub fn base_rate_for(equipment_id: &str) -> f64 {
    let id = equipment_id.to_lowercase();
    const RATES: [(&str, f64); 5] = [
        ("tractor", 450.0),
        ("harvester", 850.0),
        ("spreader", 180.0),
        ("sprayer", 280.0),
        ("seeder", 320.0),
    ];
    RATES
        .iter()
        .find(|(family, _)| id.contains(family))
        .map_or(150.0, |(_, rate)| *rate)
}

/// FNV-1a, so the same id seeds the same sequence on every platform and build
fn seed_for(equipment_id: &str) -> u64 {
    equipment_id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Randomized but reproducible availability for demos.
///
/// Produces a dense slot per day of the horizon. The random stream is seeded
/// by the equipment id, so a given id and `today` always yield the same
/// sequence.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityGenerator {
    config: GeneratorConfig,
    season: SeasonCalendar,
}

impl AvailabilityGenerator {
    pub fn new(config: GeneratorConfig, season: SeasonCalendar) -> Self {
        Self { config, season }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self, equipment_id: &str, today: NaiveDate) -> Vec<Slot> {
        self.generate_with_horizon(equipment_id, today, self.config.horizon_days)
    }

    pub fn generate_with_horizon(&self, equipment_id: &str, today: NaiveDate, horizon_days: u32) -> Vec<Slot> {
        let mut rng = StdRng::seed_from_u64(seed_for(equipment_id));
        let base = base_rate_for(equipment_id);
        let cfg = &self.config;

        let slots: Vec<Slot> = (0..horizon_days)
            .map_while(|offset| Some((offset, today.checked_add_days(Days::new(u64::from(offset)))?)))
            .map(|(offset, date)| {
                let tier = self.season.tier_for(date);
                let price = match tier {
                    PricingTier::Peak => base * cfg.peak_multiplier,
                    PricingTier::Standard => base,
                };
                let mut slot = Slot::open(date, tier, Some(price));

                // Every roll is drawn on every day so one overlay's window
                // does not shift the stream for the others.
                let reserve_roll: f64 = rng.gen();
                let maintenance_roll: f64 = rng.gen();
                let blocked_roll: f64 = rng.gen();
                let renter_pick: usize = rng.gen();
                let reservation_bytes: [u8; 16] = rng.gen();

                if offset > cfg.reserved_after_days && reserve_roll < cfg.reserved_probability {
                    slot.availability = Availability::Reserved;
                    slot.reservation = Some(ReservationMeta {
                        reservation_id: uuid::Builder::from_random_bytes(reservation_bytes).into_uuid(),
                        booked_by: Masked(self.pick_renter(renter_pick)),
                        notes: None,
                    });
                }
                if offset > cfg.maintenance_after_days && maintenance_roll < cfg.maintenance_probability {
                    slot.availability = Availability::Maintenance;
                    slot.reservation = None;
                }
                if offset > cfg.blocked_after_days && blocked_roll < cfg.blocked_probability {
                    slot.availability = Availability::Blocked;
                    slot.reservation = None;
                }
                slot
            })
            .collect();

        debug!(
            equipment_id,
            %today,
            horizon_days,
            reserved = slots.iter().filter(|s| s.availability == Availability::Reserved).count(),
            "generated availability"
        );
        slots
    }

    fn pick_renter(&self, pick: usize) -> String {
        match self.config.renters.len() {
            0 => "Client".to_string(),
            n => self.config.renters[pick % n].clone(),
        }
    }
}

impl AvailabilitySource for AvailabilityGenerator {
    fn availability(&self, equipment_id: &str, today: NaiveDate) -> Vec<Slot> {
        self.generate(equipment_id, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_dense_sequence_over_horizon() {
        let generator = AvailabilityGenerator::default();
        let slots = generator.generate("tractor-jd-6120m", today());

        assert_eq!(slots.len(), 180);
        assert_eq!(slots[0].date, today());
        assert_eq!(slots[179].date, today() + Days::new(179));
        assert!(slots.windows(2).all(|w| w[1].date == w[0].date + Days::new(1)));
    }

    #[test]
    fn test_same_id_same_sequence() {
        let generator = AvailabilityGenerator::default();
        let a = generator.generate("harvester-nh-cr880", today());
        let b = generator.generate("harvester-nh-cr880", today());
        assert_eq!(a, b);

        let other = generator.generate("sprayer-amazone-ux", today());
        let statuses = |s: &[Slot]| s.iter().map(Slot::status).collect::<Vec<_>>();
        assert_ne!(statuses(&a), statuses(&other));
    }

    #[test]
    fn test_overlay_windows_respected() {
        let generator = AvailabilityGenerator::default();
        let slots = generator.generate("seeder-lemken-solitair", today());

        for (offset, slot) in slots.iter().enumerate() {
            match slot.availability {
                Availability::Reserved => {
                    assert!(offset > 7);
                    assert!(slot.reservation.is_some());
                }
                Availability::Maintenance => assert!(offset > 30),
                Availability::Blocked => assert!(offset > 60),
                Availability::Available => assert!(slot.reservation.is_none()),
            }
        }
        assert!(slots[..8].iter().all(Slot::is_open));
    }

    #[test]
    fn test_prices_follow_family_and_season() {
        let generator = AvailabilityGenerator::default();
        let slots = generator.generate("spreader-kuhn-axis", today());

        // 2026-10-19 is in the autumn peak, 2026-12-01 is not
        assert_eq!(slots[0].price, Some(180.0 * 1.25));
        let december = slots
            .iter()
            .find(|s| s.date == NaiveDate::from_ymd_opt(2026, 12, 1).unwrap())
            .unwrap();
        assert_eq!(december.price, Some(180.0));
        assert_ne!(december.status(), SlotStatus::PeakSeason);
    }

    #[test]
    fn test_horizon_stops_at_last_representable_date() {
        let generator = AvailabilityGenerator::default();
        let start = NaiveDate::MAX - Days::new(9);
        let slots = generator.generate("tractor-jd-6120m", start);
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[9].date, NaiveDate::MAX);
    }

    #[test]
    fn test_base_rate_lookup() {
        assert_eq!(base_rate_for("TRACTOR-42"), 450.0);
        assert_eq!(base_rate_for("harvester-1"), 850.0);
        assert_eq!(base_rate_for("tool-stihl"), 150.0);
    }

    #[test]
    fn test_roughly_forty_percent_reserved() {
        let generator = AvailabilityGenerator::default();
        let slots = generator.generate_with_horizon("tractor-stats", today(), 2000);
        let reserved = slots.iter().filter(|s| s.availability == Availability::Reserved).count();
        // Reserved can be overridden later, so expect a bit under 0.4 of days past the first week
        assert!(reserved > 600 && reserved < 900, "reserved = {reserved}");
    }
}
