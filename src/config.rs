//! Command-line interface and runtime settings.
//!
//! Every option has an `ADINTEL_*` environment fallback; `main` loads a `.env`
//! file first, so settings can live there during development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::dashboard::{BackfillPolicy, DashboardSettings, DEFAULT_LIVE_SAMPLE};
use crate::db::DatabaseLocation;

/// Default rows per transaction for `load-csv`.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

fn positive(name: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        Err(ConfigError::InvalidValue {
            name,
            reason: "must be greater than zero".into(),
        })
    } else {
        Ok(value)
    }
}

/// adintel - marketing-analytics dashboard backend
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file, or `:memory:`
    #[arg(long, global = true, default_value = "data/campaigns.db", env = "ADINTEL_DATABASE")]
    pub database: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info", env = "ADINTEL_LOG_LEVEL")]
    pub log_level: String,

    /// Mailbox size of each table actor
    #[arg(long, global = true, default_value_t = 100, env = "ADINTEL_ACTOR_BUFFER")]
    pub actor_buffer: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeOptions),
    /// Create the tables (and add missing columns)
    InitDb,
    /// Replace the predictive insights with the sample rows
    SeedInsights,
    /// Bulk-load campaign rows from a CSV export
    LoadCsv {
        /// CSV file with the export column headers
        path: PathBuf,
        /// Rows per insert transaction
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "ADINTEL_CHUNK_SIZE")]
        chunk_size: usize,
    },
    /// Print table totals with CTR and ROI
    Report,
    /// Compute ROI for a single gain / cost pair
    Roi {
        #[arg(long)]
        gain: f64,
        #[arg(long)]
        cost: f64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeOptions {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:5000", env = "ADINTEL_LISTEN_ADDR")]
    pub listen_addr: SocketAddr,

    /// Prediction artifact bundle (JSON). The server starts without it; `/predict` then answers 503.
    #[arg(long, default_value = "assets/prediction_model.json", env = "ADINTEL_MODEL_PATH")]
    pub model_path: PathBuf,

    /// What the weekly trend reports for days without rows
    #[arg(long, value_enum, default_value_t = BackfillPolicy::Synthetic, env = "ADINTEL_TREND_BACKFILL")]
    pub trend_backfill: BackfillPolicy,

    /// Rows mutated per `/realTime` request
    #[arg(long, default_value_t = DEFAULT_LIVE_SAMPLE, env = "ADINTEL_LIVE_SAMPLE")]
    pub live_sample: usize,

    /// Seconds between background traffic updates (0 disables the simulator)
    #[arg(long, default_value_t = 0, env = "ADINTEL_SIMULATE_EVERY")]
    pub simulate_every: u64,
}

impl ServeOptions {
    pub fn dashboard_settings(&self) -> Result<DashboardSettings, ConfigError> {
        Ok(DashboardSettings {
            backfill: self.trend_backfill,
            live_sample: positive("live_sample", self.live_sample)?,
        })
    }

    pub fn simulator_interval(&self) -> Option<Duration> {
        (self.simulate_every > 0).then(|| Duration::from_secs(self.simulate_every))
    }
}

/// Validated settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database: DatabaseLocation,
    pub actor_buffer: usize,
}

impl Settings {
    /// In-memory tables with the default mailbox size.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::Memory,
            actor_buffer: 100,
        }
    }
}

impl Cli {
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "database",
                reason: "must not be empty".into(),
            });
        }
        Ok(Settings {
            database: DatabaseLocation::parse(self.database.trim()),
            actor_buffer: positive("actor_buffer", self.actor_buffer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["adintel", "serve"]).unwrap();
        let Command::Serve(opts) = &cli.command else {
            panic!("expected serve");
        };
        assert_eq!(opts.trend_backfill, BackfillPolicy::Synthetic);
        assert_eq!(opts.simulator_interval(), None);
        assert_eq!(opts.dashboard_settings().unwrap().live_sample, DEFAULT_LIVE_SAMPLE);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["adintel", "report", "--database", ":memory:"]).unwrap();
        assert_eq!(cli.settings().unwrap().database, DatabaseLocation::Memory);
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let cli = Cli::try_parse_from(["adintel", "--actor-buffer", "0", "init-db"]).unwrap();
        assert!(matches!(
            cli.settings(),
            Err(ConfigError::InvalidValue { name: "actor_buffer", .. })
        ));

        let cli = Cli::try_parse_from(["adintel", "serve", "--live-sample", "0", "--trend-backfill", "zero"]).unwrap();
        let Command::Serve(opts) = cli.command else {
            panic!("expected serve");
        };
        assert!(opts.dashboard_settings().is_err());
    }

    #[test]
    fn test_load_csv_arguments() {
        let cli = Cli::try_parse_from(["adintel", "load-csv", "ads.csv", "--chunk-size", "500"]).unwrap();
        match cli.command {
            Command::LoadCsv { path, chunk_size } => {
                assert_eq!(path, PathBuf::from("ads.csv"));
                assert_eq!(chunk_size, 500);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
