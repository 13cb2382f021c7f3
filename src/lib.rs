//! File-backed JSON record collections.
//!
//! A [`Collection`] is an ordered list of JSON objects, each with a unique
//! `id`, mirrored to one file as a pretty-printed JSON array. Every mutation
//! rewrites the whole file through a temp file and a rename.
//!
//! ```rust,no_run
//! use json_records::{Collection, MatchMode};
//! use serde_json::json;
//!
//! let teachers = Collection::open("db/teachers.json").unwrap();
//! let fields = json_records::record::fields_from_value(json!({"name": "Ana", "subject": "Math"})).unwrap();
//! let ana = teachers.create(fields).unwrap();
//! assert_eq!(teachers.get_by_id(ana.id().unwrap()).unwrap(), ana);
//! let hits = teachers.find_by_field("name", "Ana", MatchMode::Exact).unwrap();
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! [`Catalog`] opens the six API resources (teachers, students,
//! professionals, events, appointments, users) under one directory, and
//! [`ResourceStore`] maps calls to the status codes and `{"erro": ...}`
//! bodies the API answers with.
//!
//! **Single-process only.** If multiple processes open the same file the last
//! writer wins and earlier changes are silently lost.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod persist;
pub mod policy;
pub mod record;
pub mod resource;
pub mod serializer;
pub mod store;

pub use catalog::{Catalog, CatalogBuilder};
pub use error::{Error, ErrorBody, Result};
pub use matcher::MatchMode;
pub use policy::ReloadPolicy;
pub use record::{Fields, Record, ID_FIELD};
pub use resource::{Operation, Outcome, Query, Rejection, Reply, Resource, ResourceStore};
pub use store::{Collection, CollectionBuilder};
