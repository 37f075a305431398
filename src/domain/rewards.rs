//! Reward payloads.
//!
//! Payloads arrive as JSON text and are parsed exactly once. Two shapes are
//! accepted: a map of reward kind to quantity (`{"gold":100}`), or a list
//! whose entries are plain values or flat objects
//! (`[{"type":"primos","count":400}]`).

use crate::utils::error::{DailiesError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

const FIELD: &str = "rewards";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Rewards(Value);

/// Typed read view over one reward entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardItem {
    pub kind: String,
    pub quantity: Option<Number>,
}

impl Rewards {
    /// Parses and validates a serialized payload.
    pub fn parse(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| DailiesError::validation(FIELD, format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Object(map) => check_flat_object(map, "")?,
            Value::Array(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    match entry {
                        Value::Object(map) => check_flat_object(map, &format!("[{}]", index))?,
                        Value::Array(_) => {
                            return Err(DailiesError::validation(
                                FIELD,
                                format!("entry [{}] must not be a nested list", index),
                            ))
                        }
                        _ => {}
                    }
                }
            }
            other => {
                return Err(DailiesError::validation(
                    FIELD,
                    format!("expected an object or a list, got {}", kind_name(other)),
                ))
            }
        }
        Ok(Self(value))
    }

    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Compact JSON form, as handed back across the boundary.
    pub fn to_payload(&self) -> String {
        self.0.to_string()
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Object(map) => map.is_empty(),
            Value::Array(entries) => entries.is_empty(),
            _ => true,
        }
    }

    pub fn items(&self) -> Vec<RewardItem> {
        match &self.0 {
            Value::Object(map) => map
                .iter()
                .map(|(kind, value)| RewardItem {
                    kind: kind.clone(),
                    quantity: as_number(value),
                })
                .collect(),
            Value::Array(entries) => entries.iter().filter_map(entry_item).collect(),
            _ => Vec::new(),
        }
    }

    /// e.g. `gold x100, xp x50`
    pub fn summary(&self) -> String {
        self.items()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<Value> for Rewards {
    type Error = DailiesError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Rewards> for Value {
    fn from(rewards: Rewards) -> Self {
        rewards.0
    }
}

impl fmt::Display for RewardItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.quantity {
            Some(quantity) => write!(f, "{} x{}", self.kind, quantity),
            None => f.write_str(&self.kind),
        }
    }
}

fn check_flat_object(map: &Map<String, Value>, at: &str) -> Result<()> {
    for (key, value) in map {
        if matches!(value, Value::Object(_) | Value::Array(_)) {
            return Err(DailiesError::validation(
                FIELD,
                format!("value at {}.{} must be a plain value", at, key),
            ));
        }
    }
    Ok(())
}

fn entry_item(entry: &Value) -> Option<RewardItem> {
    match entry {
        Value::String(kind) => Some(RewardItem {
            kind: kind.clone(),
            quantity: None,
        }),
        Value::Object(map) => {
            let kind = ["type", "kind"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))?;
            let quantity = ["count", "quantity"]
                .iter()
                .find_map(|key| map.get(*key).and_then(as_number));
            Some(RewardItem {
                kind: kind.to_string(),
                quantity,
            })
        }
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
