//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if a collection needs a different on-disk format.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts collection snapshots to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a sequence of items to bytes.
    fn serialize<T>(&self, items: &[T]) -> Result<Vec<u8>>
    where
        T: Serialize;

    /// Decode bytes back into a sequence.
    fn deserialize<T>(&self, bytes: &[u8]) -> Result<Vec<T>>
    where
        T: DeserializeOwned;
}

/// JSON array serializer, pretty (2-space indent) or compact.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Pretty-printed JSON with 2-space indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::pretty()
    }
}

impl Serializer for JsonSerializer {
    fn serialize<T>(&self, items: &[T]) -> Result<Vec<u8>>
    where
        T: Serialize,
    {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(items)
        } else {
            serde_json::to_vec(items)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
