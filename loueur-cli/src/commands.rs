use anyhow::{anyhow, bail, Context as _};
use chrono::{Datelike, Local, NaiveDate, Utc};
use loueur_availability::{
    AvailabilityCalendar, AvailabilityGenerator, AvailabilitySource, BookingConstraints, CalendarCell, CalendarStats,
};
use loueur_booking::{BookingData, BookingWizard, DateGate};
use loueur_catalog::{demo_fleet, find_equipment, Equipment, PriceBreakdown, PricingEngine};
use loueur_shared::BookingConfirmedEvent;
use loueur_store::{Config, ReservationLedger};
use serde::Serialize;

use crate::cli::{BookArgs, CalendarArgs, Command, GlobalOpts, QuoteArgs, RangeArgs};

pub fn dispatch(cmd: Command, global: &GlobalOpts, config: &Config) -> anyhow::Result<()> {
    let app = App::new(global, config);
    match cmd {
        Command::Fleet => app.print(&app.fleet),
        Command::Calendar(args) => calendar(&app, args),
        Command::Quote(args) => quote(&app, args),
        Command::Book(args) => book(&app, args),
    }
}

struct App<'a> {
    config: &'a Config,
    compact: bool,
    today: NaiveDate,
    fleet: Vec<Equipment>,
    pricing: PricingEngine,
    generator: AvailabilityGenerator,
}

impl<'a> App<'a> {
    fn new(global: &GlobalOpts, config: &'a Config) -> Self {
        Self {
            config,
            compact: global.compact,
            today: global.today.unwrap_or_else(|| Local::now().date_naive()),
            fleet: demo_fleet(),
            pricing: PricingEngine::new(config.pricing.clone()),
            generator: AvailabilityGenerator::new(config.availability.clone(), config.pricing.season()),
        }
    }

    fn equipment(&self, id: &str) -> anyhow::Result<&Equipment> {
        Ok(find_equipment(&self.fleet, id)?)
    }

    fn calendar_for(&self, equipment: &Equipment) -> AvailabilityCalendar {
        let multiplier = self.config.pricing.peak_multiplier;
        AvailabilityCalendar::with_season(
            equipment.id.clone(),
            equipment.seasonal_rate(false, multiplier),
            equipment.seasonal_rate(true, multiplier),
            self.generator.availability(&equipment.id, self.today),
            self.config.pricing.season(),
            Some(BookingConstraints::for_category(equipment.category)),
            self.today,
        )
    }

    fn wizard_for(&self, equipment: &Equipment, range: &RangeArgs, gate: Option<DateGate>) -> anyhow::Result<BookingWizard> {
        let mut wizard = BookingWizard::new(equipment.clone(), self.pricing.clone());
        if let Some(gate) = gate {
            wizard = wizard.with_gate(gate);
        }
        wizard.set_dates(range.start, range.end)?;
        for extra in &range.extras {
            wizard.toggle_extra(extra)?;
        }
        Ok(wizard)
    }

    fn gate_for(&self, equipment: &Equipment) -> DateGate {
        let calendar = self.calendar_for(equipment);
        DateGate {
            index: calendar.index().clone(),
            constraints: calendar.constraints().cloned(),
            today: self.today,
        }
    }

    fn print<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        println!("{json}");
        Ok(())
    }
}

#[derive(Serialize)]
struct CalendarView {
    equipment_id: String,
    year: i32,
    month: u32,
    cells: Vec<CalendarCell>,
    stats: CalendarStats,
}

fn parse_month(month: &str) -> anyhow::Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{month}', expected YYYY-MM"))?;
    Ok((first.year(), first.month()))
}

fn calendar(app: &App<'_>, args: CalendarArgs) -> anyhow::Result<()> {
    let equipment = app.equipment(&args.equipment)?;
    let mut calendar = app.calendar_for(equipment);

    if let Some(focus) = args.week {
        return app.print(&calendar.week(focus));
    }

    if let Some(month) = args.month.as_deref() {
        let (year, month) = parse_month(month)?;
        if !calendar.show_month(year, month) {
            bail!("cannot display {year}-{month:02}");
        }
    }

    let (year, month) = calendar.displayed_month();
    app.print(&CalendarView {
        equipment_id: equipment.id.clone(),
        year,
        month,
        cells: calendar.grid(),
        stats: calendar.stats(),
    })
}

fn quote(app: &App<'_>, args: QuoteArgs) -> anyhow::Result<()> {
    let equipment = app.equipment(&args.range.equipment)?;
    let gate = (!args.unchecked).then(|| app.gate_for(equipment));
    let wizard = app.wizard_for(equipment, &args.range, gate)?;

    let breakdown: PriceBreakdown = wizard.quote().ok_or_else(|| anyhow!("no rental period"))?;
    app.print(&breakdown)
}

#[derive(Serialize)]
struct BookingReceipt {
    booking: BookingData,
    confirmation: BookingConfirmedEvent,
}

fn book(app: &App<'_>, args: BookArgs) -> anyhow::Result<()> {
    let equipment = app.equipment(&args.range.equipment)?;
    let mut wizard = app.wizard_for(equipment, &args.range, Some(app.gate_for(equipment)))?;
    if let Some(address) = args.delivery_address {
        wizard.set_delivery_address(address);
    }
    if let Some(notes) = args.notes {
        wizard.set_notes(notes);
    }

    wizard.next()?;
    wizard.next()?;

    let mut ledger = ReservationLedger::new(app.config.ledger.clone(), app.config.pricing.season());
    ledger.register(equipment, app.config.pricing.peak_multiplier);

    let mut session = ledger.session(args.renter, Utc::now());
    let booking = wizard.complete(&mut session)?;
    let confirmation = session
        .into_confirmations()
        .pop()
        .ok_or_else(|| anyhow!("booking was not confirmed"))?;

    app.print(&BookingReceipt { booking, confirmation })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-11").unwrap(), (2026, 11));
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("novembre").is_err());
    }
}
