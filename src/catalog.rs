//! All six resource collections opened under one data directory.

use crate::error::{Error, Result};
use crate::policy::ReloadPolicy;
use crate::resource::{Resource, ResourceStore};
use crate::store::Collection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Env var naming the data directory.
pub const DATA_DIR_ENV: &str = "RECORDS_DATA_DIR";
/// Env var toggling pretty-printed files (`true` / `false`).
pub const PRETTY_ENV: &str = "RECORDS_PRETTY";
/// Env var forcing one reload policy on every collection.
pub const RELOAD_ENV: &str = "RECORDS_RELOAD";
/// Data directory used when [`DATA_DIR_ENV`] is unset.
pub const DEFAULT_DATA_DIR: &str = "./db";

/// Every [`Resource`]'s collection, keyed by resource.
pub struct Catalog {
    dir: PathBuf,
    collections: HashMap<Resource, Collection>,
}

impl Catalog {
    /// Start configuring a catalog rooted at `dir`.
    pub fn builder(dir: impl AsRef<Path>) -> CatalogBuilder {
        CatalogBuilder::new(dir)
    }

    /// Open with defaults: pretty JSON and each resource's own policy.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::builder(dir).build()
    }

    /// The collection behind `resource`.
    #[must_use]
    pub fn collection(&self, resource: Resource) -> &Collection {
        // build() opens every variant of Resource::ALL
        &self.collections[&resource]
    }

    /// `resource`'s collection with its request rules applied.
    #[must_use]
    pub fn resource(&self, resource: Resource) -> ResourceStore<'_> {
        ResourceStore::new(resource, self.collection(resource))
    }

    /// Data directory the files live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("dir", &self.dir)
            .field("collections", &self.collections.len())
            .finish()
    }
}

/// Configures and opens a [`Catalog`].
///
/// ```rust,no_run
/// use json_records::{Catalog, ReloadPolicy, Resource};
///
/// let catalog = Catalog::builder("db")
///     .policy(Resource::Teachers, ReloadPolicy::AlwaysReload)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    dir: PathBuf,
    pretty: bool,
    overrides: HashMap<Resource, ReloadPolicy>,
}

impl CatalogBuilder {
    fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            pretty: true,
            overrides: HashMap::new(),
        }
    }

    /// Configure from the environment: [`DATA_DIR_ENV`], [`PRETTY_ENV`] and
    /// [`RELOAD_ENV`]. Unset vars keep their defaults; unparsable ones are
    /// [`Error::Config`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dir = lookup(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let mut builder = Self::new(dir);

        if let Some(raw) = lookup(PRETTY_ENV) {
            builder.pretty = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{PRETTY_ENV} must be true or false, got {raw:?}")))?;
        }
        if let Some(raw) = lookup(RELOAD_ENV) {
            let policy: ReloadPolicy = raw.parse()?;
            for r in Resource::ALL {
                builder.overrides.insert(r, policy);
            }
        }
        Ok(builder)
    }

    /// Write indented JSON (default: `true`).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Override the reload policy of one resource.
    pub fn policy(mut self, resource: Resource, policy: ReloadPolicy) -> Self {
        self.overrides.insert(resource, policy);
        self
    }

    /// Open every collection.
    pub fn build(self) -> Result<Catalog> {
        std::fs::create_dir_all(&self.dir)?;
        let mut collections = HashMap::with_capacity(Resource::ALL.len());
        for resource in Resource::ALL {
            let policy = self
                .overrides
                .get(&resource)
                .copied()
                .unwrap_or_else(|| resource.default_policy());
            let collection = Collection::builder(self.dir.join(resource.file_name()))
                .name(resource.name())
                .policy(policy)
                .pretty(self.pretty)
                .build()?;
            collections.insert(resource, collection);
        }
        info!(dir = %self.dir.display(), "catalog opened");
        Ok(Catalog {
            dir: self.dir,
            collections,
        })
    }
}
