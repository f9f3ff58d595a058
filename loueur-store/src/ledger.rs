use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use loueur_availability::{Availability, AvailabilitySource, ReservationMeta, Slot};
use loueur_booking::{BookingData, BookingSink, SinkError};
use loueur_catalog::{Equipment, PricingTier, SeasonCalendar};
use loueur_shared::{BookingConfirmedEvent, DateRange, HoldPlacedEvent, Masked};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Lifetime of a hold on a date range
    pub hold_seconds: i64,
    /// Days produced when the ledger serves as an availability source
    pub horizon_days: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            hold_seconds: 900,
            horizon_days: 180,
        }
    }
}

#[derive(Debug, Clone)]
struct Hold {
    equipment_id: String,
    renter: Masked<String>,
    range: DateRange,
    expires_at: DateTime<Utc>,
}

impl Hold {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// A committed booking
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub booking_id: Uuid,
    pub renter: Masked<String>,
    pub range: DateRange,
    pub booking: BookingData,
    pub confirmed_at: DateTime<Utc>,
}

/// In-memory reservation store keyed by equipment and date.
///
/// Holds are exclusive and time-limited; a commit is refused when its range
/// overlaps a committed booking or another renter's live hold.
#[derive(Debug, Default)]
pub struct ReservationLedger {
    config: LedgerConfig,
    season: SeasonCalendar,
    holds: HashMap<Uuid, Hold>,
    reservations: Vec<Reservation>,
    rates: HashMap<String, (f64, f64)>,
}

impl ReservationLedger {
    pub fn new(config: LedgerConfig, season: SeasonCalendar) -> Self {
        Self {
            config,
            season,
            holds: HashMap::new(),
            reservations: Vec::new(),
            rates: HashMap::new(),
        }
    }

    /// Record the standard and peak day rates reported for `equipment`
    pub fn register(&mut self, equipment: &Equipment, peak_multiplier: f64) {
        self.rates.insert(
            equipment.id.clone(),
            (
                equipment.seasonal_rate(false, peak_multiplier),
                equipment.seasonal_rate(true, peak_multiplier),
            ),
        );
    }

    fn booked_overlap(&self, equipment_id: &str, range: &DateRange) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|r| r.booking.equipment_id == equipment_id && r.range.overlaps(range))
    }

    fn foreign_hold(&self, equipment_id: &str, renter: &str, range: &DateRange, now: DateTime<Utc>) -> Option<&Hold> {
        self.holds.values().find(|h| {
            h.equipment_id == equipment_id && h.is_live(now) && h.renter.expose() != renter && h.range.overlaps(range)
        })
    }

    fn check_free(
        &self,
        equipment_id: &str,
        renter: &str,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if let Some(existing) = self.booked_overlap(equipment_id, range) {
            return Err(LedgerError::Conflict {
                equipment_id: equipment_id.to_string(),
                start: existing.range.start(),
                end: existing.range.end(),
            });
        }
        if let Some(hold) = self.foreign_hold(equipment_id, renter, range, now) {
            return Err(LedgerError::HeldByOther {
                equipment_id: equipment_id.to_string(),
                expires_at: hold.expires_at,
            });
        }
        Ok(())
    }

    /// Drop the renter's own holds on `range`, which a new hold or a commit
    /// supersedes
    fn drop_own_holds(&mut self, equipment_id: &str, renter: &str, range: &DateRange) {
        self.holds.retain(|_, h| {
            !(h.equipment_id == equipment_id && h.renter.expose() == renter && h.range.overlaps(range))
        });
    }

    /// Reserve `range` for `renter` for `hold_seconds`
    pub fn place_hold(
        &mut self,
        equipment_id: &str,
        renter: &str,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Result<HoldPlacedEvent, LedgerError> {
        if let Err(e) = self.check_free(equipment_id, renter, &range, now) {
            warn!(%equipment_id, start = %range.start(), end = %range.end(), error = %e, "hold refused");
            return Err(e);
        }
        self.drop_own_holds(equipment_id, renter, &range);

        let hold_id = Uuid::new_v4();
        let expires_at = now + Duration::seconds(self.config.hold_seconds);
        let renter = Masked(renter.to_string());
        self.holds.insert(
            hold_id,
            Hold {
                equipment_id: equipment_id.to_string(),
                renter: renter.clone(),
                range,
                expires_at,
            },
        );

        info!(%hold_id, %equipment_id, %renter, %expires_at, "hold placed");

        Ok(HoldPlacedEvent {
            hold_id,
            equipment_id: equipment_id.to_string(),
            renter,
            start_date: range.start(),
            end_date: range.end(),
            expires_at: expires_at.timestamp(),
        })
    }

    /// Only the holder may release a hold
    pub fn release_hold(&mut self, hold_id: Uuid, renter: &str) -> Result<(), LedgerError> {
        let hold = self.holds.get(&hold_id).ok_or(LedgerError::HoldNotFound(hold_id))?;
        if hold.renter.expose() != renter {
            return Err(LedgerError::NotHolder(hold_id));
        }
        self.holds.remove(&hold_id);
        info!(%hold_id, "hold released");
        Ok(())
    }

    /// The exclusive commit of a completed booking
    pub fn commit(
        &mut self,
        renter: &str,
        booking: &BookingData,
        now: DateTime<Utc>,
    ) -> Result<BookingConfirmedEvent, LedgerError> {
        let range = DateRange::spanning(booking.start_date, booking.end_date);
        let equipment_id = booking.equipment_id.as_str();

        if let Err(e) = self.check_free(equipment_id, renter, &range, now) {
            warn!(%equipment_id, start = %range.start(), end = %range.end(), error = %e, "commit refused");
            return Err(e);
        }
        self.drop_own_holds(equipment_id, renter, &range);

        let booking_id = Uuid::new_v4();
        let renter = Masked(renter.to_string());
        self.reservations.push(Reservation {
            booking_id,
            renter: renter.clone(),
            range,
            booking: booking.clone(),
            confirmed_at: now,
        });

        info!(
            %booking_id,
            %equipment_id,
            %renter,
            start = %range.start(),
            end = %range.end(),
            total = booking.total_price,
            "booking committed"
        );

        Ok(BookingConfirmedEvent {
            booking_id,
            equipment_id: booking.equipment_id.clone(),
            renter,
            start_date: range.start(),
            end_date: range.end(),
            days: booking.days,
            total_price: booking.total_price,
            deposit: booking.deposit,
            delivery_address: booking.delivery_address.clone(),
            timestamp: now.timestamp(),
        })
    }

    /// Drop holds past their expiry; returns how many were dropped
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.holds.len();
        self.holds.retain(|_, h| h.is_live(now));
        let purged = before - self.holds.len();
        if purged > 0 {
            debug!(purged, "expired holds purged");
        }
        purged
    }

    pub fn live_holds(&self, now: DateTime<Utc>) -> usize {
        self.holds.values().filter(|h| h.is_live(now)).count()
    }

    pub fn bookings_for<'a>(&'a self, equipment_id: &'a str) -> impl Iterator<Item = &'a Reservation> + 'a {
        self.reservations
            .iter()
            .filter(move |r| r.booking.equipment_id == equipment_id)
    }

    /// A sink committing wizard output on behalf of `renter`
    pub fn session(&mut self, renter: impl Into<String>, now: DateTime<Utc>) -> LedgerSession<'_> {
        LedgerSession {
            ledger: self,
            renter: renter.into(),
            now,
            confirmations: Vec::new(),
        }
    }

    fn slot_for(&self, equipment_id: &str, date: NaiveDate) -> Slot {
        let tier = self.season.tier_for(date);
        let price = self.rates.get(equipment_id).map(|(base, peak)| match tier {
            PricingTier::Peak => *peak,
            PricingTier::Standard => *base,
        });
        let mut slot = Slot::open(date, tier, price);

        if let Some(r) = self
            .reservations
            .iter()
            .find(|r| r.booking.equipment_id == equipment_id && r.range.contains(date))
        {
            slot.availability = Availability::Reserved;
            slot.reservation = Some(ReservationMeta {
                reservation_id: r.booking_id,
                booked_by: r.renter.clone(),
                notes: r.booking.notes.clone(),
            });
        }
        slot
    }
}

/// Committed days are reserved, every other day is open
impl AvailabilitySource for ReservationLedger {
    fn availability(&self, equipment_id: &str, today: NaiveDate) -> Vec<Slot> {
        (0..self.config.horizon_days)
            .map_while(|offset| today.checked_add_days(Days::new(u64::from(offset))))
            .map(|date| self.slot_for(equipment_id, date))
            .collect()
    }
}

/// Borrowed view of the ledger for one renter at one instant
pub struct LedgerSession<'a> {
    ledger: &'a mut ReservationLedger,
    renter: String,
    now: DateTime<Utc>,
    confirmations: Vec<BookingConfirmedEvent>,
}

impl LedgerSession<'_> {
    pub fn confirmations(&self) -> &[BookingConfirmedEvent] {
        &self.confirmations
    }

    pub fn into_confirmations(self) -> Vec<BookingConfirmedEvent> {
        self.confirmations
    }
}

impl BookingSink for LedgerSession<'_> {
    fn submit(&mut self, booking: &BookingData) -> Result<(), SinkError> {
        let event = self.ledger.commit(&self.renter, booking, self.now)?;
        self.confirmations.push(event);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("Equipment {equipment_id} is already booked from {start} to {end}")]
    Conflict {
        equipment_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Equipment {equipment_id} is being booked by another renter until {expires_at}")]
    HeldByOther {
        equipment_id: String,
        expires_at: DateTime<Utc>,
    },

    #[error("Hold not found: {0}")]
    HoldNotFound(Uuid),

    #[error("Hold {0} belongs to another renter")]
    NotHolder(Uuid),
}
