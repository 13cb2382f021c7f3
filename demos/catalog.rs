//! Walks one request of each shape through the users resource and prints the
//! status and body an HTTP layer would send back.
//!
//! `RECORDS_DATA_DIR=/tmp/records cargo run --example catalog`

use json_records::{CatalogBuilder, Outcome, Resource};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn show(label: &str, outcome: Outcome) -> Option<serde_json::Value> {
    match outcome {
        Ok(reply) => {
            println!("{label:<28} {} {}", reply.status, reply.body);
            Some(reply.body)
        }
        Err(rejection) => {
            let body = serde_json::to_string(&rejection.body).unwrap_or_default();
            println!("{label:<28} {} {body}", rejection.status);
            None
        }
    }
}

fn main() -> Result<(), json_records::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let catalog = CatalogBuilder::from_env()?.build()?;
    let users = catalog.resource(Resource::Users);

    let created = show(
        "POST /users",
        users.create(json!({
            "name": "Ana Souza",
            "email": "ana@example.com",
            "username": "ana.souza",
            "pwd": "secret",
            "level": "admin",
            "status": "on"
        })),
    );
    let id = created
        .as_ref()
        .and_then(|b| b["id"].as_str())
        .unwrap_or_default()
        .to_string();

    show("GET /users", users.list());
    show("GET /users/{id}", users.get(&id));
    show("GET /users/username/ana", users.find("username", "ana"));
    show("GET /users/username/zz", users.find("username", "zz"));
    show("PUT /users/{id}", users.update(&id, json!({"name": "Ana S.", "status": "off"})));
    show("DELETE /users/{id}", users.delete(&id));
    show("DELETE /users/{id} again", users.delete(&id));
    Ok(())
}
