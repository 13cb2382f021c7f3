//! Core collection type and its builder.

use crate::error::{Error, Result};
use crate::matcher::MatchMode;
use crate::persist::{atomic_write, ensure_parent, load};
use crate::policy::ReloadPolicy;
use crate::record::{Fields, Record};
use crate::serializer::{JsonSerializer, Serializer};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use uuid::Uuid;

/// An ordered, file-backed sequence of [`Record`]s.
///
/// Records keep insertion order. Every mutation rewrites the whole file
/// (temp file + rename) before returning. If that write fails the mutation
/// stays applied in memory and the call returns a persistence error, so
/// memory and disk can disagree until the next successful write or
/// [`reload`](Self::reload).
///
/// Mutations hold the write lock across the file write, which serializes
/// writers within one process. Nothing coordinates separate processes that
/// open the same file.
pub struct Collection {
    records: RwLock<Vec<Record>>,
    name: String,
    path: PathBuf,
    serializer: JsonSerializer,
    policy: ReloadPolicy,
}

impl Collection {
    /// Open (or create) a collection at `path` with the cached policy and
    /// pretty-printed JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a new collection. Call
    /// [`.build()`](CollectionBuilder::build) when ready.
    pub fn builder(path: impl AsRef<Path>) -> CollectionBuilder {
        CollectionBuilder::new(path)
    }

    // ---- reads ----

    /// All records in insertion order.
    ///
    /// Only fails under [`ReloadPolicy::AlwaysReload`], when re-reading the
    /// file fails.
    pub fn list(&self) -> Result<Vec<Record>> {
        self.read(|records| records.to_vec())
    }

    /// First record whose identifier equals `id`.
    pub fn get_by_id(&self, id: &str) -> Result<Record> {
        self.read(|records| records.iter().find(|r| r.has_id(id)).cloned())?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Every record whose string field `field` satisfies `mode` against
    /// `value`, in insertion order. Records without the field, or with a
    /// non-string value there, never match. No match is an empty vec.
    pub fn find_by_field(&self, field: &str, value: &str, mode: MatchMode) -> Result<Vec<Record>> {
        self.read(|records| {
            records
                .iter()
                .filter(|r| r.get_str(field).is_some_and(|s| mode.matches(s, value)))
                .cloned()
                .collect()
        })
    }

    /// `true` if a record with this identifier exists.
    pub fn contains(&self, id: &str) -> Result<bool> {
        self.read(|records| records.iter().any(|r| r.has_id(id)))
    }

    /// Number of records held in memory. Under
    /// [`ReloadPolicy::AlwaysReload`] this is the count as of the last
    /// operation, not a fresh read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// `true` when the in-memory copy has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collection name used in log output.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload policy this collection was opened with.
    #[must_use]
    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }

    // ---- writes ----

    /// Append a new record built from `fields` under a freshly generated
    /// UUID v4. Any `id` in `fields` is discarded.
    pub fn create(&self, fields: Fields) -> Result<Record> {
        let record = Record::with_id(Uuid::new_v4().to_string(), fields);
        let out = record.clone();
        self.write(|records| {
            records.push(record);
            Ok(())
        })?;
        info!(collection = %self.name, id = out.id().unwrap_or_default(), "record created");
        Ok(out)
    }

    /// Replace the record stored under `id` with `fields`. The identifier is
    /// kept from the lookup key; an `id` inside `fields` is ignored. The
    /// record keeps its position.
    pub fn update(&self, id: &str, fields: Fields) -> Result<Record> {
        let record = self.write(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.has_id(id))
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            *slot = Record::with_id(id, fields);
            Ok(slot.clone())
        })?;
        info!(collection = %self.name, id, "record updated");
        Ok(record)
    }

    /// Remove the record stored under `id` and return it. Remaining records
    /// keep their relative order.
    pub fn delete(&self, id: &str) -> Result<Record> {
        let removed = self.write(|records| {
            let index = records
                .iter()
                .position(|r| r.has_id(id))
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            Ok(records.remove(index))
        })?;
        info!(collection = %self.name, id, "record deleted");
        Ok(removed)
    }

    // ---- persistence ----

    /// Replace the in-memory copy with what's on disk.
    pub fn reload(&self) -> Result<()> {
        let mut records = self.records.write();
        self.refresh(&mut records)
    }

    /// Write the in-memory copy to disk now.
    pub fn flush(&self) -> Result<()> {
        let records = self.records.read();
        self.persist(&records)
    }

    // ---- internal ----

    fn read<R>(&self, f: impl FnOnce(&[Record]) -> R) -> Result<R> {
        if self.policy.reloads() {
            let mut records = self.records.write();
            self.refresh(&mut records)?;
            return Ok(f(records.as_slice()));
        }
        let records = self.records.read();
        Ok(f(records.as_slice()))
    }

    /// Run `f` under the write lock and persist if it succeeds. A failed
    /// `f` must leave `records` untouched; nothing is written then.
    fn write<R>(&self, f: impl FnOnce(&mut Vec<Record>) -> Result<R>) -> Result<R> {
        let mut records = self.records.write();
        if self.policy.reloads() {
            self.refresh(&mut records)?;
        }
        let out = f(&mut *records)?;
        self.persist(&records)?;
        Ok(out)
    }

    fn refresh(&self, records: &mut Vec<Record>) -> Result<()> {
        *records = load(&self.path, &self.serializer)?;
        debug!(collection = %self.name, count = records.len(), "reloaded from disk");
        Ok(())
    }

    fn persist(&self, records: &[Record]) -> Result<()> {
        let written = self
            .serializer
            .serialize(records)
            .and_then(|bytes| atomic_write(&self.path, &bytes));
        match &written {
            Ok(()) => {
                debug!(collection = %self.name, count = records.len(), path = %self.path.display(), "flushed")
            }
            Err(e) => {
                error!(collection = %self.name, path = %self.path.display(), error = %e, "failed to persist collection")
            }
        }
        written
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`Collection`].
///
/// ```rust,no_run
/// use json_records::{Collection, ReloadPolicy};
///
/// let students = Collection::builder("db/students.json")
///     .name("students")
///     .policy(ReloadPolicy::AlwaysReload)
///     .build()
///     .unwrap();
/// ```
pub struct CollectionBuilder {
    path: PathBuf,
    name: Option<String>,
    policy: ReloadPolicy,
    pretty: bool,
}

impl CollectionBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: None,
            policy: ReloadPolicy::Cached,
            pretty: true,
        }
    }

    /// Name used in log output (default: the file stem).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the reload policy (default: [`ReloadPolicy::Cached`]).
    pub fn policy(mut self, policy: ReloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write indented JSON (default: `true`).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Create the parent directory, load the file if present and return the
    /// collection. A missing or empty file is an empty collection.
    pub fn build(self) -> Result<Collection> {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::Config(format!("not a file path: {}", self.path.display())))?;
        let name = self.name.unwrap_or(stem);

        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::compact()
        };

        ensure_parent(&self.path)?;
        let records: Vec<Record> = load(&self.path, &serializer)?;
        debug!(collection = %name, count = records.len(), path = %self.path.display(), policy = %self.policy, "opened");

        Ok(Collection {
            records: RwLock::new(records),
            name,
            path: self.path,
            serializer,
            policy: self.policy,
        })
    }
}

impl std::fmt::Debug for CollectionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionBuilder")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("pretty", &self.pretty)
            .finish()
    }
}
