// ==========================================
// Lot Cost Engine - command line entry point
// ==========================================
// JSON results on stdout, logs and errors on stderr
// Exit codes: 0 ok, 1 server-side failure, 2 caller error
// ==========================================

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lot_cost_engine::api::ApiError;
use lot_cost_engine::app::{get_default_db_path, AppState};
use lot_cost_engine::{db, logging};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lot-cost")]
#[command(about = "Full cost and efficiency reports for livestock lots", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database (default: $LOT_COST_DB_PATH, then the user data dir)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Date used as "today" for open lots (YYYY-MM-DD)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Purchase, feed, direct and prorated cost of a lot
    TotalCost { lot_id: String },

    /// Mortality, conversion and unit cost figures of a lot
    Indicators { lot_id: String },

    /// Share of one month's shared expenses charged to a lot
    Proration {
        lot_id: String,
        year: i32,
        month: u32,
    },

    /// Pens, head count and removals of a lot
    Summary { lot_id: String },

    /// Create the schema in the database (idempotent)
    InitDb,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::LogFormat::from_flag(cli.log_json));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            match err.downcast_ref::<ApiError>() {
                Some(api_err) if api_err.is_client_error() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!(version = lot_cost_engine::VERSION, db_path = %db_path, "lot-cost");

    if let Commands::InitDb = cli.cmd {
        let conn = db::open_sqlite_connection(&db_path)
            .with_context(|| format!("opening {}", db_path))?;
        db::init_schema(&conn).context("creating schema")?;
        let version = db::read_schema_version(&conn).context("reading schema version")?;
        return print_json(&serde_json::json!({
            "db_path": db_path,
            "schema_version": version,
        }));
    }

    let state = AppState::new(db_path, cli.as_of).map_err(anyhow::Error::msg)?;
    let api = &state.report_api;

    match cli.cmd {
        Commands::TotalCost { lot_id } => print_json(&api.get_total_cost(&lot_id)?),
        Commands::Indicators { lot_id } => print_json(&api.get_efficiency_indicators(&lot_id)?),
        Commands::Proration {
            lot_id,
            year,
            month,
        } => print_json(&api.get_month_proration(&lot_id, year, month)?),
        Commands::Summary { lot_id } => print_json(&api.get_lot_summary(&lot_id)?),
        Commands::InitDb => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing result")?;
    println!("{}", out);
    Ok(())
}
