use crate::domain::calendar::DayKey;
use crate::domain::rewards::Rewards;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionId(pub i64);

impl fmt::Display for CommissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommissionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,
    pub description: String,
    pub realm: String,
    pub rewards: Rewards,
    pub date: DayKey,
    pub created_at_ms: i64,
    #[serde(default)]
    pub completed: bool,
}

/// A validated commission that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionDraft {
    pub description: String,
    pub realm: String,
    pub rewards: Rewards,
    pub date: DayKey,
    pub created_at_ms: i64,
}

impl CommissionDraft {
    pub fn into_commission(self, id: CommissionId) -> Commission {
        Commission {
            id,
            description: self.description,
            realm: self.realm,
            rewards: self.rewards,
            date: self.date,
            created_at_ms: self.created_at_ms,
            completed: false,
        }
    }
}
