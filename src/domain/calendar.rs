//! Day-key derivation.
//!
//! A commission belongs to the calendar day of its creation timestamp. The
//! day is computed in one [`TimeReference`], which is recorded with the
//! persisted data so that stamping and lookup can never disagree.

use crate::utils::error::{DailiesError, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which clock decides where a day starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeReference {
    #[default]
    Local,
    Utc,
}

impl TimeReference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Utc => "utc",
        }
    }

    /// Truncates a millisecond timestamp to its calendar day.
    pub fn day_key(&self, timestamp_ms: i64) -> Result<DayKey> {
        let instant = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
            DailiesError::validation(
                "date",
                format!("timestamp {} ms is outside the supported range", timestamp_ms),
            )
        })?;

        let date = match self {
            Self::Local => instant.with_timezone(&Local).date_naive(),
            Self::Utc => instant.date_naive(),
        };
        Ok(DayKey(date))
    }

    /// A timestamp inside `day`. Noon is used because every zone has one,
    /// unlike midnight on some DST transitions.
    pub fn timestamp_within(&self, day: DayKey) -> Result<i64> {
        let noon = day.0.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        match self {
            Self::Utc => Ok(noon.and_utc().timestamp_millis()),
            Self::Local => Local
                .from_local_datetime(&noon)
                .earliest()
                .map(|dt| dt.timestamp_millis())
                .ok_or_else(|| {
                    DailiesError::validation("date", format!("{} has no local noon", day))
                }),
        }
    }

    pub fn today(&self) -> DayKey {
        match self {
            Self::Local => DayKey(Local::now().date_naive()),
            Self::Utc => DayKey(Utc::now().date_naive()),
        }
    }
}

impl fmt::Display for TimeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeReference {
    type Err = DailiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(DailiesError::InvalidConfigValueError {
                field: "calendar.time_reference".to_string(),
                value: other.to_string(),
                reason: "Expected `local` or `utc`".to_string(),
            }),
        }
    }
}

/// Canonical calendar day used to bucket commissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = DailiesError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| DailiesError::validation("date", format!("`{}` is not YYYY-MM-DD: {}", s, e)))
    }
}
