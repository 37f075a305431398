pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "sqlite")]
pub use adapters::storage::SqliteBackend;
pub use adapters::storage::{Backend, BackendKind, JsonFileBackend, MemoryBackend};
pub use app::{AppSettings, DailiesApp, LogNotifier, Notifier};
pub use crate::core::store::CommissionStore;
pub use domain::calendar::{DayKey, TimeReference};
pub use domain::model::{Commission, CommissionId};
pub use domain::rewards::{RewardItem, Rewards};
pub use utils::error::{DailiesError, Result};
