use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use loueur_availability::{AvailabilityCalendar, AvailabilitySource, BookingConstraints, SelectionOutcome};
use loueur_booking::{BookingWizard, WizardError, WizardStep};
use loueur_catalog::{demo_fleet, find_equipment, PricingEngine};
use loueur_store::{Config, LedgerError, ReservationLedger};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap()
}

fn wizard_for(id: &str, start: NaiveDate, end: NaiveDate) -> BookingWizard {
    let fleet = demo_fleet();
    let equipment = find_equipment(&fleet, id).unwrap().clone();
    let mut wizard = BookingWizard::new(equipment, PricingEngine::default());
    wizard.set_dates(start, end).unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard
}

#[test]
fn second_renter_loses_the_race_and_can_reselect() {
    let config = Config::default();
    let mut ledger = ReservationLedger::new(config.ledger.clone(), config.pricing.season());

    let mut first = wizard_for("seeder-lemken-solitair", date(2026, 11, 2), date(2026, 11, 8));
    let mut second = wizard_for("seeder-lemken-solitair", date(2026, 11, 6), date(2026, 11, 12));

    let mut session = ledger.session("Aminata Fall", now());
    first.complete(&mut session).unwrap();
    assert_eq!(session.into_confirmations().len(), 1);

    let mut session = ledger.session("Ibrahima Ndiaye", now());
    let err = second.complete(&mut session).unwrap_err();
    match err {
        WizardError::Sink(source) => {
            let ledger_err = source.downcast_ref::<LedgerError>().unwrap();
            assert!(matches!(ledger_err, LedgerError::Conflict { .. }));
        }
        other => panic!("expected a sink refusal, got {other:?}"),
    }
    assert!(session.confirmations().is_empty());
    assert_eq!(second.step(), WizardStep::Review);

    // Back to the dates step, pick a free week and try again
    second.back();
    second.back();
    second.set_dates(date(2026, 11, 9), date(2026, 11, 15)).unwrap();
    second.next().unwrap();
    second.next().unwrap();

    let mut session = ledger.session("Ibrahima Ndiaye", now());
    let booking = second.complete(&mut session).unwrap();
    assert_eq!(booking.days, 7);
    assert_eq!(ledger.bookings_for("seeder-lemken-solitair").count(), 2);
}

#[test]
fn live_hold_blocks_competing_commit() {
    let mut ledger = ReservationLedger::default();
    let mut wizard = wizard_for("tool-stihl-ms500i", date(2026, 11, 2), date(2026, 11, 3));

    let held = loueur_shared::DateRange::spanning(date(2026, 11, 1), date(2026, 11, 2));
    ledger.place_hold("tool-stihl-ms500i", "Mamadou Diallo", held, now()).unwrap();

    let mut session = ledger.session("Fatou Sow", now());
    assert!(matches!(wizard.complete(&mut session), Err(WizardError::Sink(_))));

    ledger.purge_expired(now() + chrono::Duration::minutes(15));
    let mut session = ledger.session("Fatou Sow", now() + chrono::Duration::minutes(15));
    assert!(wizard.complete(&mut session).is_ok());
}

#[test]
fn calendar_over_ledger_refuses_booked_days() {
    let fleet = demo_fleet();
    let seeder = find_equipment(&fleet, "seeder-lemken-solitair").unwrap();
    let config = Config::default();
    let today = date(2026, 10, 19);

    let mut ledger = ReservationLedger::new(config.ledger.clone(), config.pricing.season());
    ledger.register(seeder, config.pricing.peak_multiplier);

    let mut session = ledger.session("Aminata Fall", now());
    let mut wizard = wizard_for("seeder-lemken-solitair", date(2026, 11, 4), date(2026, 11, 6));
    wizard.complete(&mut session).unwrap();

    let slots = ledger.availability(&seeder.id, today);
    // November is peak: 320 × 1.25
    assert_eq!(slots[16].price, Some(400.0));

    let mut calendar = AvailabilityCalendar::with_season(
        seeder.id.clone(),
        seeder.price_per_day,
        seeder.price_per_day * config.pricing.peak_multiplier,
        slots,
        config.pricing.season(),
        Some(BookingConstraints::for_category(seeder.category)),
        today,
    );

    assert!(!calendar.is_selectable(date(2026, 11, 5)));
    calendar.click(date(2026, 11, 2));
    assert!(matches!(calendar.click(date(2026, 11, 8)), SelectionOutcome::Rejected(_)));
}
