//! Command-line front end for the daily metrics log.
//!
//! # Responsibility
//! - Resolve configuration (flags over `DAILYLOG_*` environment variables).
//! - Open the store explicitly and hand it to subcommands.
//! - Turn core errors into one-line user messages and a failing exit code.
//!
//! ```bash
//! dailylog add --sleep 7.5 --calories 2100 --hydration 2.5 --mileage 3
//! dailylog list --from 2024-03-01
//! dailylog charts --granularity week
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use dailylog_core::db::open_db;
use dailylog_core::{init_logging, AppConfig};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{run, Command};

#[derive(Debug, Parser)]
#[command(name = "dailylog")]
#[command(about = "Record and chart daily health metrics", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file (overrides DAILYLOG_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute log directory (overrides DAILYLOG_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Mirror warnings and errors to stderr (overrides DAILYLOG_LOG_STDERR)
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli, mut config: AppConfig) -> AppConfig {
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if cli.log_stderr {
        config.log_to_stderr = true;
    }
    config
}

fn execute(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli, AppConfig::from_env());

    if let Some(logging) = config.logging() {
        init_logging(&logging).map_err(anyhow::Error::msg)?;
    }

    let mut conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open database `{}`", config.db_path.display()))?;
    let today = chrono::Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();

    run(&cli.command, &mut conn, today, &mut stdout)?;
    info!("event=cli_command module=cli status=ok");
    Ok(())
}
