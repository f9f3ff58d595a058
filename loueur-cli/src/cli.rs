use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// loueur -- farm equipment availability, pricing and booking
#[derive(Debug, Parser)]
#[command(
    name = "loueur",
    version,
    about = "Browse equipment availability, price rentals and book them",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Reference date used as "today" (defaults to the local date)
    #[arg(long, env = "LOUEUR_TODAY", global = true)]
    pub today: Option<NaiveDate>,

    /// Single-line JSON output
    #[arg(long, global = true)]
    pub compact: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the equipment available for rent
    Fleet,

    /// Show the month grid of one equipment unit
    Calendar(CalendarArgs),

    /// Price a rental without booking it
    Quote(QuoteArgs),

    /// Run the booking flow and commit the result
    Book(BookArgs),
}

impl Command {
    /// Subcommand name, safe to log; arguments may carry personal data
    pub fn name(&self) -> &'static str {
        match self {
            Command::Fleet => "fleet",
            Command::Calendar(_) => "calendar",
            Command::Quote(_) => "quote",
            Command::Book(_) => "book",
        }
    }
}

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Equipment id, see `loueur fleet`
    pub equipment: String,

    /// Month to display, as YYYY-MM
    #[arg(long)]
    pub month: Option<String>,

    /// Only the week containing this date
    #[arg(long, conflicts_with = "month")]
    pub week: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Equipment id, see `loueur fleet`
    pub equipment: String,

    /// First rental day (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last rental day, inclusive
    #[arg(long)]
    pub end: NaiveDate,

    /// Extra service id, repeatable
    #[arg(long = "extra", short = 'e')]
    pub extras: Vec<String>,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Skip the availability and category policy checks
    #[arg(long)]
    pub unchecked: bool,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Name of the renter
    #[arg(long)]
    pub renter: String,

    #[arg(long)]
    pub delivery_address: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}
