//! Generic key/value record backing every entity the service returns.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Key whose object contents are lifted into the record on construction.
const DATA_KEY: &str = "data";

/// Ordered set of named fields taken from one suggestion.
///
/// Fields keep the order the service sent them in. When the source object has
/// a `data` object, its fields are merged into the top level (overriding any
/// field of the same name in place) and `data` itself is dropped.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns the stored value, or `default` on a miss.
    pub fn get_or<'a>(&'a self, key: &str, default: Value) -> Cow<'a, Value> {
        match self.attributes.get(key) {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(default),
        }
    }

    /// Returns the stored value, or the result of `default` on a miss.
    /// `default` is not called when the key is present.
    pub fn get_or_else<'a, F>(&'a self, key: &str, default: F) -> Cow<'a, Value>
    where
        F: FnOnce() -> Value,
    {
        match self.attributes.get(key) {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(default()),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Stores `value` under `key`, keeping the key's position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(key.into(), value)
    }

    /// Field rendered as text. Missing, null and structured values read as "".
    pub fn text(&self, key: &str) -> Cow<'_, str> {
        match self.attributes.get(key) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    /// Suggestion text as shown in a dropdown.
    pub fn value(&self) -> Cow<'_, str> {
        self.text("value")
    }

    /// Full suggestion text.
    pub fn unrestricted_value(&self) -> Cow<'_, str> {
        self.text("unrestricted_value")
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes.iter()
    }

    pub fn to_map(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.attributes
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.attributes).context("Failed to serialize record")
    }
}

impl From<Map<String, Value>> for Record {
    fn from(source: Map<String, Value>) -> Self {
        if !matches!(source.get(DATA_KEY), Some(Value::Object(_))) {
            return Self { attributes: source };
        }

        let mut attributes = Map::with_capacity(source.len());
        let mut data = Map::new();
        for (key, value) in source {
            match value {
                Value::Object(nested) if key == DATA_KEY => data = nested,
                value => {
                    attributes.insert(key, value);
                }
            }
        }
        for (key, value) in data {
            if key != DATA_KEY {
                attributes.insert(key, value);
            }
        }

        Self { attributes }
    }
}

/// Non-object values carry no fields and produce an empty record.
impl From<Value> for Record {
    fn from(source: Value) -> Self {
        match source {
            Value::Object(map) => Record::from(map),
            _ => Record::default(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}
