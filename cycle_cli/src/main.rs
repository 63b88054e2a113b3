use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use cycle_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cycleguard")]
#[command(about = "Private, offline cycle tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today (for testing)
    #[arg(long, global = true, value_parser = parse_day_arg)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record your cycle baseline and finish onboarding
    Setup {
        /// First day of your last period (YYYY-MM-DD)
        #[arg(long, value_parser = parse_day_arg)]
        last_period: NaiveDate,

        /// How many days your period usually lasts
        #[arg(long, allow_hyphen_values = true)]
        period_length: Option<i32>,

        /// Days from the start of one period to the next
        #[arg(long, allow_hyphen_values = true)]
        cycle_length: Option<i32>,
    },

    /// Show today's date and when the next period is due (default)
    Status,

    /// Show a month with logged and predicted days
    Calendar(CalendarArgs),

    /// Log a day as a period day
    Log {
        #[arg(value_parser = parse_day_arg)]
        date: NaiveDate,
    },

    /// Remove a logged period day
    Unlog {
        #[arg(value_parser = parse_day_arg)]
        date: NaiveDate,
    },

    /// Log the day if it isn't logged, unlog it if it is
    Toggle {
        #[arg(value_parser = parse_day_arg)]
        date: NaiveDate,
    },

    /// Save symptoms and notes for a day, replacing any earlier entry
    Symptom {
        #[arg(value_parser = parse_day_arg)]
        date: NaiveDate,

        /// Symptom tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Free-text notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Export logged history to a CSV file
    Export {
        /// Directory to write the export into
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete all cycle data
    Reset {
        /// Confirm deleting everything
        #[arg(long)]
        yes: bool,
    },

    /// Print all stored data as JSON
    Show,
}

#[derive(Args)]
struct CalendarArgs {
    /// Year to show (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Month to show, 1-12 (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Months to move from the selected month, e.g. -1 for the previous one
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset: i32,
}

/// Tell the user a store write failed before propagating the error
fn saved<T>(result: Result<T>) -> Result<T> {
    result.map_err(|e| {
        eprintln!("Saving failed: {}", e);
        e
    })
}

fn parse_day_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_day(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    // Initialize logging
    cycle_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let store = DataStore::from_config(&config)?;
    tracing::debug!("Using data store at {:?}", store.path());
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        Some(Commands::Setup {
            last_period,
            period_length,
            cycle_length,
        }) => cmd_setup(&store, &config, last_period, period_length, cycle_length),
        Some(Commands::Status) | None => cmd_status(&store, today),
        Some(Commands::Calendar(args)) => cmd_calendar(&store, today, args),
        Some(Commands::Log { date }) => {
            saved(store.add_period_day(date))?;
            println!("✓ Logged {} as a period day", date);
            Ok(())
        }
        Some(Commands::Unlog { date }) => {
            saved(store.remove_period_day(date))?;
            println!("✓ Removed {} from period days", date);
            Ok(())
        }
        Some(Commands::Toggle { date }) => {
            if saved(store.toggle_period_day(date))? {
                println!("✓ Logged {} as a period day", date);
            } else {
                println!("✓ Removed {} from period days", date);
            }
            Ok(())
        }
        Some(Commands::Symptom { date, tags, notes }) => {
            saved(store.save_symptom_log(SymptomLog {
                date,
                symptoms: tags,
                notes,
            }))?;
            println!("✓ Saved symptoms for {}", date);
            Ok(())
        }
        Some(Commands::Export { out }) => cmd_export(&store, &config, out, today),
        Some(Commands::Reset { yes }) => cmd_reset(&store, yes),
        Some(Commands::Show) => {
            let data = store.get_user_data();
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
    }
}

fn cmd_setup(
    store: &DataStore,
    config: &Config,
    last_period: NaiveDate,
    period_length: Option<i32>,
    cycle_length: Option<i32>,
) -> Result<()> {
    let cycle = CycleData::new(
        last_period,
        period_length.unwrap_or(config.cycle.default_period_length),
        cycle_length.unwrap_or(config.cycle.default_cycle_length),
    );
    cycle.validate()?;

    saved(store.save_cycle_data(cycle.clone()))?;
    saved(store.mark_onboarding_complete())?;

    println!("✓ Cycle saved");
    println!("  Last period: {}", format_long_date(cycle.last_period_start));
    println!("  Period length: {} days", cycle.period_length);
    println!("  Cycle length: {} days", cycle.cycle_length);
    println!(
        "  Next period due: {}",
        format_long_date(calculate_next_period(&cycle))
    );
    Ok(())
}

/// The stored cycle, or `None` after printing a hint to run setup
fn require_cycle(data: &UserData) -> Option<&CycleData> {
    match (&data.cycle_data, data.has_completed_onboarding) {
        (Some(cycle), true) => Some(cycle),
        _ => {
            println!("No cycle set up yet. Run `cycleguard setup --last-period YYYY-MM-DD` first.");
            None
        }
    }
}

fn cmd_status(store: &DataStore, today: NaiveDate) -> Result<()> {
    let data = store.get_user_data();
    let Some(cycle) = require_cycle(&data) else {
        return Ok(());
    };

    println!("Today is {}", format_date(today));
    println!(
        "Next Period Due: {}",
        format_date(calculate_next_period(cycle))
    );
    Ok(())
}

fn cmd_calendar(store: &DataStore, today: NaiveDate, args: CalendarArgs) -> Result<()> {
    let data = store.get_user_data();
    if require_cycle(&data).is_none() {
        return Ok(());
    }

    let year = args.year.unwrap_or(today.year());
    let month = args.month.unwrap_or(today.month());
    let grid = shift_month(year, month, args.offset)
        .and_then(|(year, month)| MonthGrid::build(&data, year, month, today))
        .ok_or_else(|| {
            let err = Error::InvalidDate(format!(
                "{}-{:02} shifted by {} months is outside the supported calendar",
                year, month, args.offset
            ));
            eprintln!("Calendar failed: {}", err);
            err
        })?;

    display_month(&grid);
    Ok(())
}

fn display_month(grid: &MonthGrid) {
    println!("\n  {}", grid.title);
    let header: String = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
        .iter()
        .map(|d| format!("{:>5}", d))
        .collect();
    println!("  {}", header);

    for week in grid.weeks() {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) => format!("{:>5}", render_day(day)),
                None => " ".repeat(5),
            })
            .collect();
        println!("  {}", row);
    }

    println!();
    println!("  * logged   P predicted period   F fertile   [] today");
}

fn render_day(day: &CalendarDay) -> String {
    let marker = if day.is_logged_period {
        "*"
    } else if day.is_predicted_period {
        "P"
    } else if day.is_fertile {
        "F"
    } else {
        ""
    };
    let cell = format!("{}{}", day.day, marker);
    if day.is_today {
        format!("[{}]", cell)
    } else {
        cell
    }
}

fn cmd_export(
    store: &DataStore,
    config: &Config,
    out: Option<PathBuf>,
    today: NaiveDate,
) -> Result<()> {
    let data = store.get_user_data();
    let dir = out.unwrap_or_else(|| config.export_dir());

    match export_to_csv(&data, &dir, today) {
        Ok(path) => {
            println!("✓ Exported cycle data");
            println!("  CSV: {}", path.display());
            Ok(())
        }
        Err(Error::NothingToExport) => {
            println!("No data to export yet. Start tracking to build your history!");
            Ok(())
        }
        Err(e) => {
            eprintln!("Export failed: {}", e);
            Err(e)
        }
    }
}

fn cmd_reset(store: &DataStore, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes all cycle data. Re-run with --yes to confirm.");
        return Ok(());
    }

    store.reset_all_data().map_err(|e| {
        eprintln!("Reset failed: {}", e);
        e
    })?;
    println!("✓ All data reset");
    Ok(())
}
