//! Typed world-state payload.
//!
//! The source of truth for a scenario's world context is an owned value tree:
//! cycles are unrepresentable, so acyclicity is structural rather than checked
//! at serialization time. Conversion from caller JSON applies a depth guard so
//! pathologically nested payloads are rejected before any store I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Maximum nesting depth accepted from caller-supplied JSON.
pub const MAX_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldStateError {
    #[error("world state must be a JSON object at the top level")]
    NotAnObject,
    #[error("world state nesting exceeds {MAX_DEPTH} levels")]
    TooDeep,
    #[error("world state contains a non-finite number")]
    NonFiniteNumber,
}

/// A single value in the world-state tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WorldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<WorldValue>),
    Map(BTreeMap<String, WorldValue>),
}

impl WorldValue {
    fn from_json(value: &Value, depth: usize) -> Result<Self, WorldStateError> {
        if depth > MAX_DEPTH {
            return Err(WorldStateError::TooDeep);
        }
        match value {
            Value::Null => Ok(WorldValue::Null),
            Value::Bool(b) => Ok(WorldValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(WorldValue::Number)
                .ok_or(WorldStateError::NonFiniteNumber),
            Value::String(s) => Ok(WorldValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| Self::from_json(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(WorldValue::List),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), Self::from_json(v, depth + 1)?)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(WorldValue::Map),
        }
    }
}

/// Arbitrary serializable context data attached to a scenario, opaque to the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WorldState(pub BTreeMap<String, WorldValue>);

impl WorldState {
    /// An empty world state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Convert caller-supplied JSON into a typed world state.
    ///
    /// The top level must be an object; nesting beyond [`MAX_DEPTH`] is rejected.
    pub fn from_value(value: &Value) -> Result<Self, WorldStateError> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), WorldValue::from_json(v, 1)?)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(WorldState),
            Value::Null => Ok(Self::empty()),
            _ => Err(WorldStateError::NotAnObject),
        }
    }

    pub fn get(&self, key: &str) -> Option<&WorldValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
