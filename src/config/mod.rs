pub mod environment;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::storage::BackendKind;
#[cfg(feature = "cli")]
use crate::domain::calendar::{DayKey, TimeReference};
#[cfg(feature = "cli")]
use crate::domain::model::CommissionId;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dailies")]
#[command(about = "Track daily commissions and the rewards they grant")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the storage file location
    #[arg(long, global = true)]
    pub data_path: Option<String>,

    /// Override the storage backend (json, sqlite, memory)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Override the day convention (local, utc)
    #[arg(long, global = true)]
    pub time_reference: Option<TimeReference>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the commissions of one day (today by default)
    List {
        /// Day as YYYY-MM-DD
        #[arg(long, conflicts_with = "at_ms")]
        date: Option<DayKey>,

        /// Any millisecond timestamp within the day
        #[arg(long, allow_negative_numbers = true)]
        at_ms: Option<i64>,
    },
    /// Create a commission
    Create {
        #[arg(short, long)]
        description: String,

        #[arg(short, long, default_value = "Realm of Duty")]
        realm: String,

        /// Rewards as JSON, e.g. '{"gold":100}'
        #[arg(long, default_value = "{}")]
        rewards: String,

        /// Creation time in milliseconds, defaults to now
        #[arg(long, allow_negative_numbers = true)]
        at_ms: Option<i64>,
    },
    /// Mark a commission as completed
    Complete { id: CommissionId },
    /// Delete a commission
    Delete { id: CommissionId },
    /// Show locale, development mode and storage location
    Info,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取設定檔（若有指定）並套用命令列覆蓋
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(backend) = self.backend {
            settings.storage.backend = backend;
        }
        if let Some(path) = &self.data_path {
            settings.storage.path = Some(path.clone());
        }
        if let Some(reference) = self.time_reference {
            settings.calendar.time_reference = reference;
        }

        Ok(settings)
    }
}
