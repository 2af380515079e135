//! Asset records returned by database queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record returned by an [`AssetDatabase`](crate::AssetDatabase)
/// query: a flat map of field name to JSON value, holding only the fields
/// the query asked for and the backend had data for.
///
/// Linked-entity fields use the backend's dotted naming, e.g.
/// `entity.Shot.sg_cut_in`, and are stored under that flat key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRecord(Map<String, Value>);

impl AssetRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON object. Returns `None` for any other JSON shape.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    /// Raw field access. `null` values are treated as absent.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// A string field, if present and non-empty.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field)?.as_str().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field)?.as_i64()
    }

    /// A structured (object) field, e.g. the `path` attachment on a
    /// published file. Present-but-empty objects are still returned.
    #[must_use]
    pub fn get_object(&self, field: &str) -> Option<&Map<String, Value>> {
        self.get(field)?.as_object()
    }

    /// Copies the named fields into a new record, skipping fields this
    /// record does not carry.
    #[must_use]
    pub fn project(&self, fields: &[&str]) -> Self {
        let mut out = Map::new();
        for field in fields {
            if let Some(v) = self.0.get(*field) {
                out.insert((*field).to_string(), v.clone());
            }
        }
        Self(out)
    }
}

impl<const N: usize> From<[(&str, Value); N]> for AssetRecord {
    fn from(entries: [(&str, Value); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}
