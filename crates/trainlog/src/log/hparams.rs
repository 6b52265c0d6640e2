//! Hyperparameter snapshots.

use crate::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A key/value snapshot of an experiment's configuration.
///
/// Keys are kept in lexicographic order so the rendered text is identical for
/// identical content, whatever order the entries were inserted in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hparams(BTreeMap<String, Value>);

impl Hparams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from any value that serializes to a map, such as a
    /// config struct.
    pub fn from_serialize<T: Serialize + ?Sized>(cfg: &T) -> Result<Self> {
        let value =
            serde_json::to_value(cfg).map_err(|e| LoggerError::InvalidHparams(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(LoggerError::InvalidHparams(format!(
                "expected a key/value mapping, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Insert an entry, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Render as `"{key}: {value}"` lines joined by `"\n\t"`, sorted by key.
    ///
    /// Strings print bare. Every other value prints as compact JSON, so
    /// booleans and nulls read `true` and `null`.
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{}: {}", key, display_value(value)))
            .collect::<Vec<_>>()
            .join("\n\t")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Hparams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// Strings print bare; everything else prints as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}
