//! Reload policies: which copy of a collection is authoritative.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Decides whether a collection trusts its in-memory copy or the file.
///
/// Every mutation is written to disk straight away under either policy; the
/// difference is only in where reads and mutations start from.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPolicy {
    /// Load once at open, then memory is authoritative. External edits to the
    /// file are not seen until [`reload`](crate::Collection::reload).
    #[default]
    Cached,
    /// Re-read the file at the start of every operation. Picks up external
    /// edits at the cost of a full parse per call.
    AlwaysReload,
}

impl ReloadPolicy {
    pub(crate) fn reloads(self) -> bool {
        matches!(self, ReloadPolicy::AlwaysReload)
    }
}

impl fmt::Display for ReloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadPolicy::Cached => f.write_str("cached"),
            ReloadPolicy::AlwaysReload => f.write_str("always-reload"),
        }
    }
}

impl FromStr for ReloadPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cached" => Ok(ReloadPolicy::Cached),
            "always-reload" | "always_reload" | "reload" => Ok(ReloadPolicy::AlwaysReload),
            other => Err(Error::Config(format!("unknown reload policy {other:?}"))),
        }
    }
}
