//! CLI administration tool for beer-cellar.
//!
//! Inspects and removes advent calendars and checks the database without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show a calendar by id, by name, or by a date it covers
//! cargo run --bin admin -- calendar show --cellar 1 --id 4
//! cargo run --bin admin -- calendar show --cellar 1 --name "Christmas 2024"
//! cargo run --bin admin -- calendar show --cellar 1 --date 2024-12-05T00:00:00+01:00
//!
//! # Delete a calendar
//! cargo run --bin admin -- calendar delete --cellar 1 --id 4
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use beer_cellar::config::Config;
use beer_cellar::domain::clock::SystemClock;
use beer_cellar::domain::entities::{AdventCalendar, CalendarLookup};
use beer_cellar::server;
use beer_cellar::state::AppState;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing beer-cellar.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or delete advent calendars
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CalendarAction {
    /// Print a calendar and its days
    Show(ShowArgs),

    /// Delete a calendar and all of its days
    Delete {
        /// Cellar the calendar belongs to
        #[arg(long)]
        cellar: i64,

        /// Calendar id
        #[arg(long)]
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Args)]
struct ShowArgs {
    /// Cellar the calendar belongs to
    #[arg(long)]
    cellar: i64,

    /// Calendar id
    #[arg(
        long,
        conflicts_with_all = ["name", "date"],
        required_unless_present_any = ["name", "date"]
    )]
    id: Option<i64>,

    /// Calendar name
    #[arg(long, conflicts_with = "date")]
    name: Option<String>,

    /// RFC 3339 date inside the calendar's range
    #[arg(long)]
    date: Option<String>,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = server::connect_pool(&config).await?;

    match cli.command {
        Commands::Calendar { action } => {
            let state = AppState::new(
                Arc::new(pool),
                server::rng_source(&config),
                Arc::new(SystemClock),
            );
            handle_calendar_action(action, &state).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_calendar_action(action: CalendarAction, state: &AppState) -> Result<()> {
    match action {
        CalendarAction::Show(args) => show_calendar(state, args).await,
        CalendarAction::Delete { cellar, id, yes } => delete_calendar(state, cellar, id, yes).await,
    }
}

fn lookup_from(args: &ShowArgs) -> Result<CalendarLookup> {
    if let Some(id) = args.id {
        return Ok(CalendarLookup::Id(id));
    }
    if let Some(name) = &args.name {
        return Ok(CalendarLookup::Name(name.clone()));
    }
    let raw = args
        .date
        .as_deref()
        .context("One of --id, --name or --date is required")?;
    let date = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid --date '{raw}', expected RFC 3339"))?;
    Ok(CalendarLookup::ContainingDate(date))
}

/// Prints a calendar with one line per day.
///
/// # Output Format
///
/// ```text
/// 🎄 Christmas 2024 (#4, cellar 1)
///    2024-12-01 → 2024-12-24
///
///   Day         Revealed  Entry  Beer
///   ───────────────────────────────────────────────────────────────
///   2024-12-01  yes       17     Black Albert (De Struise)
///   2024-12-02  no        3      Abt 12 (St. Bernardus)
/// ```
async fn show_calendar(state: &AppState, args: ShowArgs) -> Result<()> {
    let lookup = lookup_from(&args)?;

    let calendar = state
        .calendar_service
        .get_calendar(args.cellar, lookup)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load calendar: {}", e))?;

    print_calendar(&calendar);
    Ok(())
}

fn print_calendar(calendar: &AdventCalendar) {
    println!(
        "{} {} {}",
        "🎄".bright_green(),
        calendar.name.bright_blue().bold(),
        format!("(#{}, cellar {})", calendar.id, calendar.cellar_id).bright_black()
    );
    println!(
        "   {} → {}",
        calendar.start_date.format("%Y-%m-%d"),
        calendar.end_date.format("%Y-%m-%d")
    );
    if !calendar.description.is_empty() {
        println!("   {}", calendar.description.bright_black());
    }
    println!();

    println!(
        "  {:<11} {:<9} {:<6} {}",
        "Day".bright_white().bold(),
        "Revealed".bright_white().bold(),
        "Entry".bright_white().bold(),
        "Beer".bright_white().bold()
    );
    println!("  {}", "─".repeat(63).bright_black());

    for day in &calendar.days {
        let revealed = if day.revealed {
            "yes".green()
        } else {
            "no".yellow()
        };
        let mut beer = format!("{} ({})", day.entry.beer.name, day.entry.beer.brewery_name);
        if day.entry.is_removed() {
            beer.push_str(" [removed]");
        }

        println!(
            "  {:<11} {:<9} {:<6} {}",
            day.day.format("%Y-%m-%d").to_string(),
            revealed,
            day.entry.id.to_string().bright_black(),
            beer.cyan()
        );
    }

    println!();
    println!(
        "  Total days: {}",
        calendar.days.len().to_string().bright_white().bold()
    );
    println!();
}

/// Deletes a calendar after confirmation (default: No).
async fn delete_calendar(state: &AppState, cellar: i64, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Advent Calendar".bright_blue().bold());
    println!();

    let calendar = state
        .calendar_service
        .get_calendar(cellar, CalendarLookup::Id(id))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load calendar: {}", e))?;

    println!("  Calendar: {}", calendar.name.cyan());
    println!("  ID:       {}", calendar.id.to_string().bright_black());
    println!("  Days:     {}", calendar.days.len());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this calendar?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state
        .calendar_service
        .delete_calendar(cellar, id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete calendar: {}", e))?;

    println!();
    println!("{}", "✅ Calendar deleted".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let calendars: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM advent_calendars")
                .fetch_one(pool)
                .await?;
            let live_entries: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM cellar_entries WHERE deleted_at IS NULL",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL:    {}", version.bright_white());
            println!(
                "  Calendars:     {}",
                calendars.to_string().bright_green().bold()
            );
            println!(
                "  Live entries:  {}",
                live_entries.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
