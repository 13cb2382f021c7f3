//! The record type: one JSON object with a reserved identifier field.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field every record carries.
pub const ID_FIELD: &str = "id";

/// Field name to value mapping supplied by callers on create/update.
pub type Fields = Map<String, Value>;

/// A single stored entity.
///
/// Serializes as a plain JSON object. Key order is kept as inserted, so a
/// record read from disk is written back with the same layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Fields);

impl Record {
    /// Build a record with `id` as its first field followed by `fields`.
    /// An `id` inside `fields` is dropped.
    pub fn with_id(id: impl Into<String>, fields: Fields) -> Self {
        let mut map = Map::with_capacity(fields.len() + 1);
        map.insert(ID_FIELD.to_string(), Value::String(id.into()));
        // filter rather than remove: removal would reorder the remaining keys
        map.extend(fields.into_iter().filter(|(k, _)| k != ID_FIELD));
        Self(map)
    }

    /// Identifier, or `None` for a hand-edited entry that lacks one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of `field`, if present and a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Borrow all fields, identifier included.
    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Unwrap into the underlying map.
    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.0
    }

    /// Convert into a `serde_json::Value::Object`.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub(crate) fn has_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

/// Turn a request body into [`Fields`]. Anything other than an object is
/// rejected with [`Error::InvalidRecord`].
pub fn fields_from_value(value: Value) -> Result<Fields> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidRecord(kind_of(&other).to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
