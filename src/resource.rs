//! The six resource collections and their request-level behavior.
//!
//! A [`Resource`] pins down everything that differs between collections:
//! file name, reload policy, which body fields are kept, which lookups are
//! exposed and with what [`MatchMode`], and the messages clients see.
//! [`ResourceStore`] applies those rules on top of a [`Collection`] and
//! answers with a status code and a JSON body.

use crate::error::{Error, ErrorBody};
use crate::matcher::MatchMode;
use crate::policy::ReloadPolicy;
use crate::record::{fields_from_value, Fields, Record};
use crate::store::Collection;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// A field lookup exposed under `/{resource}/{route}/{value}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    /// Path segment naming the lookup.
    pub route: &'static str,
    /// Record field it compares against.
    pub field: &'static str,
    /// How the comparison is done.
    pub mode: MatchMode,
    /// Message sent back when nothing matches.
    pub no_match: &'static str,
}

const fn query(
    route: &'static str,
    field: &'static str,
    mode: MatchMode,
    no_match: &'static str,
) -> Query {
    Query {
        route,
        field,
        mode,
        no_match,
    }
}

/// Which call a persistence failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Reading the file (only under [`ReloadPolicy::AlwaysReload`]).
    Read,
    /// `POST`
    Create,
    /// `PUT`
    Update,
    /// `DELETE`
    Delete,
}

/// One of the collections served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `teachers.json`
    Teachers,
    /// `students.json`
    Students,
    /// `professionals.json`
    Professionals,
    /// `events.json`
    Events,
    /// `appointments.json`
    Appointments,
    /// `users.json`
    Users,
}

impl Resource {
    /// Every resource, in route registration order.
    pub const ALL: [Resource; 6] = [
        Resource::Teachers,
        Resource::Students,
        Resource::Professionals,
        Resource::Events,
        Resource::Appointments,
        Resource::Users,
    ];

    /// Route prefix and collection name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Resource::Teachers => "teachers",
            Resource::Students => "students",
            Resource::Professionals => "professionals",
            Resource::Events => "events",
            Resource::Appointments => "appointments",
            Resource::Users => "users",
        }
    }

    /// Backing file name inside the data directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }

    /// Default reload policy. Students and professionals trust the file;
    /// the rest keep memory authoritative.
    #[must_use]
    pub fn default_policy(self) -> ReloadPolicy {
        match self {
            Resource::Students | Resource::Professionals => ReloadPolicy::AlwaysReload,
            _ => ReloadPolicy::Cached,
        }
    }

    /// Fields kept from create/update bodies, in stored order. `None` keeps
    /// the body as sent.
    #[must_use]
    pub fn projection(self) -> Option<&'static [&'static str]> {
        match self {
            Resource::Teachers | Resource::Students | Resource::Professionals => None,
            Resource::Events => Some(&["description", "comments", "date"]),
            Resource::Appointments => {
                Some(&["specialty", "comments", "date", "student", "professional"])
            }
            Resource::Users => Some(&["name", "email", "username", "pwd", "level", "status"]),
        }
    }

    /// Field lookups this resource exposes.
    #[must_use]
    pub fn queries(self) -> &'static [Query] {
        const TEACHERS: &[Query] = &[query(
            "name",
            "name",
            MatchMode::Exact,
            "Nenhum(a) professor(a) encontrado(a) com esse nome",
        )];
        const EVENTS: &[Query] = &[query(
            "name",
            "description",
            MatchMode::ContainsIgnoreCase,
            "Nenhum evento encontrado com esse nome",
        )];
        const APPOINTMENTS: &[Query] = &[
            query("date", "date", MatchMode::Prefix, "Agendamento não encontrado"),
            query(
                "specialty",
                "specialty",
                MatchMode::Exact,
                "Nenhum agendamento encontrado com esse nome",
            ),
        ];
        const USERS: &[Query] = &[query(
            "username",
            "username",
            MatchMode::Prefix,
            "Usuário não encontrado",
        )];

        match self {
            Resource::Teachers => TEACHERS,
            Resource::Events => EVENTS,
            Resource::Appointments => APPOINTMENTS,
            Resource::Users => USERS,
            Resource::Students | Resource::Professionals => &[],
        }
    }

    /// Look up a query by its route segment.
    #[must_use]
    pub fn query(self, route: &str) -> Option<Query> {
        self.queries().iter().copied().find(|q| q.route == route)
    }

    /// Status code for a successful create.
    #[must_use]
    pub fn create_status(self) -> u16 {
        match self {
            Resource::Users => 201,
            _ => 200,
        }
    }

    /// Message for an unknown id.
    #[must_use]
    pub fn not_found_message(self) -> &'static str {
        match self {
            Resource::Teachers => "Professor(a) não encontrado",
            Resource::Students | Resource::Professionals => "Aluno não encontrado!",
            Resource::Events => "Evento não encontrado!",
            Resource::Appointments => "Agendamento não encontrado",
            Resource::Users => "Usuário não encontrado",
        }
    }

    /// Message for a failed file read or write during `op`. Only users word
    /// a failed delete differently.
    #[must_use]
    pub fn save_failed_message(self, op: Operation) -> &'static str {
        match (self, op) {
            (Resource::Teachers, _) => "Erro ao salvar o(a) professor(a)",
            (Resource::Students, _) => "Erro ao salvar o aluno",
            (Resource::Professionals, _) => "Erro ao salvar o profissional",
            (Resource::Events, _) => "Erro ao salvar evento!",
            (Resource::Appointments, _) => "Erro ao salvar o agendamento",
            (Resource::Users, Operation::Delete) => "Erro ao salvar as alterações",
            (Resource::Users, _) => "Erro ao salvar o usuário",
        }
    }

    /// Confirmation attached to a delete, for resources that answer with one.
    #[must_use]
    pub fn deleted_message(self) -> Option<&'static str> {
        match self {
            Resource::Teachers => Some("Professor(a) removido(a) com sucesso"),
            Resource::Events => Some("Evento excluído com sucesso!"),
            Resource::Appointments => Some("Agendamento excluído com sucesso"),
            Resource::Users => Some("Usuário removido com sucesso"),
            Resource::Students | Resource::Professionals => None,
        }
    }

    /// Apply [`projection`](Self::projection) to a body.
    #[must_use]
    pub fn project(self, mut fields: Fields) -> Fields {
        let Some(keep) = self.projection() else {
            return fields;
        };
        let mut out = Fields::with_capacity(keep.len());
        for key in keep {
            if let Some(value) = fields.remove(*key) {
                out.insert((*key).to_string(), value);
            }
        }
        out
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| Error::Config(format!("unknown resource {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Boundary
// ---------------------------------------------------------------------------

/// Successful answer: status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// HTTP status.
    pub status: u16,
    /// Response body.
    pub body: Value,
}

impl Reply {
    fn ok(body: impl Into<Value>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Failed answer: status code plus `{"erro": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// HTTP status.
    pub status: u16,
    /// Error body.
    pub body: ErrorBody,
    /// Underlying store error.
    pub cause: Error,
}

/// Result of a [`ResourceStore`] call.
pub type Outcome = std::result::Result<Reply, Rejection>;

/// A [`Collection`] viewed through one [`Resource`]'s rules.
#[derive(Debug, Clone, Copy)]
pub struct ResourceStore<'a> {
    resource: Resource,
    collection: &'a Collection,
}

impl<'a> ResourceStore<'a> {
    /// Bind `resource`'s rules to `collection`.
    pub fn new(resource: Resource, collection: &'a Collection) -> Self {
        Self {
            resource,
            collection,
        }
    }

    /// Which resource this is.
    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// The underlying collection.
    #[must_use]
    pub fn collection(&self) -> &'a Collection {
        self.collection
    }

    /// `GET /{resource}`
    pub fn list(&self) -> Outcome {
        let records = self.collection.list().map_err(|e| self.reject(e, Operation::Read))?;
        Ok(Reply::ok(records_value(records)))
    }

    /// `GET /{resource}/{id}`
    pub fn get(&self, id: &str) -> Outcome {
        let record = self.collection.get_by_id(id).map_err(|e| self.reject(e, Operation::Read))?;
        Ok(Reply::ok(record))
    }

    /// `GET /{resource}/{route}/{value}`. An unknown route or an empty
    /// result is a 404.
    pub fn find(&self, route: &str, value: &str) -> Outcome {
        let Some(q) = self.resource.query(route) else {
            warn!(resource = %self.resource, route, "unknown query route");
            return Err(self.reject(Error::NotFound(format!("{route}/{value}")), Operation::Read));
        };
        let records = self
            .collection
            .find_by_field(q.field, value, q.mode)
            .map_err(|e| self.reject(e, Operation::Read))?;
        if records.is_empty() {
            warn!(resource = %self.resource, route, value, "query matched nothing");
            return Err(self.rejection(404, q.no_match, Error::NotFound(value.to_string())));
        }
        Ok(Reply::ok(records_value(records)))
    }

    /// `POST /{resource}`
    pub fn create(&self, body: Value) -> Outcome {
        let fields = self.body_fields(body, Operation::Create)?;
        let record = self
            .collection
            .create(fields)
            .map_err(|e| self.reject(e, Operation::Create))?;
        Ok(Reply {
            status: self.resource.create_status(),
            body: record.into_value(),
        })
    }

    /// `PUT /{resource}/{id}`
    pub fn update(&self, id: &str, body: Value) -> Outcome {
        let fields = self.body_fields(body, Operation::Update)?;
        let record = self
            .collection
            .update(id, fields)
            .map_err(|e| self.reject(e, Operation::Update))?;
        Ok(Reply::ok(record))
    }

    /// `DELETE /{resource}/{id}`
    pub fn delete(&self, id: &str) -> Outcome {
        let removed = self.collection.delete(id).map_err(|e| self.reject(e, Operation::Delete))?;
        let body = match self.resource.deleted_message() {
            Some(message) => json!({ "id": id, "message": message }),
            None => Value::Array(vec![removed.into_value()]),
        };
        Ok(Reply::ok(body))
    }

    fn body_fields(&self, body: Value, op: Operation) -> Result<Fields, Rejection> {
        let fields = fields_from_value(body).map_err(|e| self.reject(e, op))?;
        Ok(self.resource.project(fields))
    }

    fn reject(&self, cause: Error, op: Operation) -> Rejection {
        let message = match &cause {
            Error::NotFound(_) => self.resource.not_found_message().to_string(),
            e if e.is_persistence() => self.resource.save_failed_message(op).to_string(),
            other => other.to_string(),
        };
        self.rejection(cause.status(), message, cause)
    }

    fn rejection(&self, status: u16, message: impl Into<String>, cause: Error) -> Rejection {
        Rejection {
            status,
            body: ErrorBody::new(message),
            cause,
        }
    }
}

fn records_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Record::into_value).collect())
}
