pub mod json_file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::core::{Commission, CommissionBackend, CommissionDraft, CommissionId, Result};
use crate::domain::calendar::{DayKey, TimeReference};
use crate::utils::error::DailiesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Json,
    Sqlite,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        })
    }
}

impl FromStr for BackendKind {
    type Err = DailiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(DailiesError::InvalidConfigValueError {
                field: "storage.backend".to_string(),
                value: other.to_string(),
                reason: "Expected `json`, `sqlite` or `memory`".to_string(),
            }),
        }
    }
}

/// Backend chosen at startup from configuration.
pub enum Backend {
    Json(JsonFileBackend),
    Memory(MemoryBackend),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteBackend),
}

impl Backend {
    pub fn open(kind: BackendKind, path: &str, time_reference: TimeReference) -> Result<Self> {
        match kind {
            BackendKind::Json => Ok(Self::Json(JsonFileBackend::open(path, time_reference)?)),
            BackendKind::Memory => Ok(Self::Memory(MemoryBackend::new(time_reference))),
            #[cfg(feature = "sqlite")]
            BackendKind::Sqlite => Ok(Self::Sqlite(SqliteBackend::open(path, time_reference)?)),
            #[cfg(not(feature = "sqlite"))]
            BackendKind::Sqlite => Err(DailiesError::ConfigError {
                message: "this build does not include the sqlite backend".to_string(),
            }),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Backend::Json($inner) => $body,
            Backend::Memory($inner) => $body,
            #[cfg(feature = "sqlite")]
            Backend::Sqlite($inner) => $body,
        }
    };
}

impl CommissionBackend for Backend {
    fn time_reference(&self) -> TimeReference {
        dispatch!(self, b => b.time_reference())
    }

    fn describe(&self) -> String {
        dispatch!(self, b => b.describe())
    }

    fn load_day(&self, day: DayKey) -> Result<Vec<Commission>> {
        dispatch!(self, b => b.load_day(day))
    }

    fn insert(&mut self, draft: CommissionDraft) -> Result<Commission> {
        dispatch!(self, b => b.insert(draft))
    }

    fn mark_completed(&mut self, id: CommissionId) -> Result<Option<bool>> {
        dispatch!(self, b => b.mark_completed(id))
    }

    fn remove(&mut self, id: CommissionId) -> Result<bool> {
        dispatch!(self, b => b.remove(id))
    }

    fn close(self) -> Result<()> {
        dispatch!(self, b => b.close())
    }
}
