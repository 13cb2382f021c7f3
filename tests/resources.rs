use json_records::catalog::{DATA_DIR_ENV, PRETTY_ENV, RELOAD_ENV};
use json_records::{Catalog, CatalogBuilder, Error, ReloadPolicy, Resource};
use serde_json::{json, Value};
use std::collections::HashMap;

fn catalog() -> (tempfile::TempDir, Catalog) {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path()).unwrap();
    (dir, catalog)
}

fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap().to_string()
}

// ---- catalog ----------------------------------------------------------------

#[test]
fn catalog_opens_one_file_per_resource() {
    let (dir, catalog) = catalog();
    for r in Resource::ALL {
        let c = catalog.collection(r);
        assert_eq!(c.name(), r.name());
        assert_eq!(c.path(), dir.path().join(format!("{}.json", r.name())));
        assert_eq!(c.policy(), r.default_policy());
    }
    assert_eq!(catalog.collection(Resource::Students).policy(), ReloadPolicy::AlwaysReload);
    assert_eq!(catalog.collection(Resource::Users).policy(), ReloadPolicy::Cached);
}

#[test]
fn collections_are_independent() {
    let (_dir, catalog) = catalog();
    let teacher = catalog.resource(Resource::Teachers).create(json!({"name": "Ana"})).unwrap();
    let id = id_of(&teacher.body);
    assert_eq!(catalog.resource(Resource::Students).get(&id).unwrap_err().status, 404);
    assert!(catalog.collection(Resource::Events).is_empty());
}

#[test]
fn builder_policy_override() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builder(dir.path())
        .policy(Resource::Teachers, ReloadPolicy::AlwaysReload)
        .pretty(false)
        .build()
        .unwrap();
    assert_eq!(catalog.collection(Resource::Teachers).policy(), ReloadPolicy::AlwaysReload);
    assert_eq!(catalog.dir(), dir.path());
}

#[test]
fn env_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let vars: HashMap<&str, String> = [
        (DATA_DIR_ENV, dir.path().join("data").display().to_string()),
        (PRETTY_ENV, "false".to_string()),
        (RELOAD_ENV, "always-reload".to_string()),
    ]
    .into_iter()
    .collect();

    let catalog = CatalogBuilder::from_lookup(|k| vars.get(k).cloned())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(catalog.dir(), dir.path().join("data"));
    for r in Resource::ALL {
        assert_eq!(catalog.collection(r).policy(), ReloadPolicy::AlwaysReload);
    }

    catalog.resource(Resource::Events).create(json!({"description": "x"})).unwrap();
    let raw = std::fs::read_to_string(dir.path().join("data/events.json")).unwrap();
    assert!(!raw.contains('\n'));
}

#[test]
fn env_configuration_rejects_bad_values() {
    let bad_pretty = CatalogBuilder::from_lookup(|k| (k == PRETTY_ENV).then(|| "yes".to_string()));
    assert!(matches!(bad_pretty, Err(Error::Config(_))));

    let bad_reload = CatalogBuilder::from_lookup(|k| (k == RELOAD_ENV).then(|| "never".to_string()));
    assert!(matches!(bad_reload, Err(Error::Config(_))));
}

// ---- responses --------------------------------------------------------------

#[test]
fn users_create_is_201_with_projected_fields() {
    let (_dir, catalog) = catalog();
    let users = catalog.resource(Resource::Users);
    let reply = users
        .create(json!({
            "username": "ana.souza",
            "name": "Ana",
            "admin": true,
            "id": "forged"
        }))
        .unwrap();
    assert_eq!(reply.status, 201);
    let keys: Vec<&str> = reply.body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "name", "username"]);
    assert_ne!(reply.body["id"], "forged");
}

#[test]
fn other_creates_are_200() {
    let (_dir, catalog) = catalog();
    for r in Resource::ALL.into_iter().filter(|r| *r != Resource::Users) {
        assert_eq!(catalog.resource(r).create(json!({"name": "x"})).unwrap().status, 200);
    }
}

#[test]
fn get_and_list_replies() {
    let (_dir, catalog) = catalog();
    let teachers = catalog.resource(Resource::Teachers);
    let created = teachers.create(json!({"name": "Ana", "subject": "Math"})).unwrap();

    let got = teachers.get(&id_of(&created.body)).unwrap();
    assert_eq!(got.status, 200);
    assert_eq!(got.body, created.body);

    let all = teachers.list().unwrap();
    assert_eq!(all.body, json!([created.body]));
}

#[test]
fn not_found_body_uses_resource_message() {
    let (_dir, catalog) = catalog();
    let cases = [
        (Resource::Teachers, "Professor(a) não encontrado"),
        (Resource::Students, "Aluno não encontrado!"),
        (Resource::Events, "Evento não encontrado!"),
        (Resource::Appointments, "Agendamento não encontrado"),
        (Resource::Users, "Usuário não encontrado"),
    ];
    for (r, message) in cases {
        let store = catalog.resource(r);
        for rejection in [
            store.get("nonexistent-id").unwrap_err(),
            store.update("nonexistent-id", json!({})).unwrap_err(),
            store.delete("nonexistent-id").unwrap_err(),
        ] {
            assert_eq!(rejection.status, 404);
            assert_eq!(rejection.body.erro, message);
            assert!(rejection.cause.is_not_found());
        }
    }
}

#[test]
fn non_object_body_is_400() {
    let (_dir, catalog) = catalog();
    let rejection = catalog
        .resource(Resource::Teachers)
        .create(json!("just a string"))
        .unwrap_err();
    assert_eq!(rejection.status, 400);
    assert!(matches!(rejection.cause, Error::InvalidRecord(_)));
    assert!(catalog.collection(Resource::Teachers).is_empty());
}

#[test]
fn update_keeps_path_id_and_projects() {
    let (_dir, catalog) = catalog();
    let events = catalog.resource(Resource::Events);
    let created = events
        .create(json!({"description": "Feira", "comments": "", "date": "2024-10-05"}))
        .unwrap();
    let id = id_of(&created.body);

    let updated = events
        .update(&id, json!({"id": "other", "description": "Feira de Ciências", "stray": 1}))
        .unwrap();
    assert_eq!(updated.body, json!({"id": id, "description": "Feira de Ciências"}));
    assert_eq!(events.get(&id).unwrap().body, updated.body);
}

#[test]
fn delete_bodies() {
    let (_dir, catalog) = catalog();

    let teachers = catalog.resource(Resource::Teachers);
    let id = id_of(&teachers.create(json!({"name": "Ana"})).unwrap().body);
    let reply = teachers.delete(&id).unwrap();
    assert_eq!(
        reply.body,
        json!({"id": id, "message": "Professor(a) removido(a) com sucesso"})
    );

    let students = catalog.resource(Resource::Students);
    let created = students.create(json!({"nome": "Eragon"})).unwrap();
    let reply = students.delete(&id_of(&created.body)).unwrap();
    assert_eq!(reply.body, json!([created.body]));
}

// ---- queries ----------------------------------------------------------------

#[test]
fn teachers_name_is_exact() {
    let (_dir, catalog) = catalog();
    let teachers = catalog.resource(Resource::Teachers);
    teachers.create(json!({"name": "Ana"})).unwrap();
    teachers.create(json!({"name": "Ana Paula"})).unwrap();

    let hits = teachers.find("name", "Ana").unwrap();
    assert_eq!(hits.body.as_array().unwrap().len(), 1);

    let miss = teachers.find("name", "ana").unwrap_err();
    assert_eq!(miss.status, 404);
    assert_eq!(miss.body.erro, "Nenhum(a) professor(a) encontrado(a) com esse nome");
}

#[test]
fn events_name_searches_description_ignoring_case() {
    let (_dir, catalog) = catalog();
    let events = catalog.resource(Resource::Events);
    events.create(json!({"description": "Palestra com João Silva"})).unwrap();
    events.create(json!({"description": "Feira"})).unwrap();
    events.create(json!({"comments": "no description"})).unwrap();

    let hits = events.find("name", "joão").unwrap();
    let hits = hits.body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["description"], "Palestra com João Silva");
}

#[test]
fn appointments_date_prefix_and_specialty_exact() {
    let (_dir, catalog) = catalog();
    let appts = catalog.resource(Resource::Appointments);
    for (date, specialty) in [
        ("2024-10-05T09:00", "Psicologia"),
        ("2024-10-07T14:00", "Fonoaudiologia"),
        ("2024-11-01T08:00", "Psicologia"),
    ] {
        appts
            .create(json!({"date": date, "specialty": specialty, "student": "Ana", "professional": "Dr. Luz"}))
            .unwrap();
    }

    assert_eq!(appts.find("date", "2024-10").unwrap().body.as_array().unwrap().len(), 2);
    assert_eq!(appts.find("specialty", "Psicologia").unwrap().body.as_array().unwrap().len(), 2);
    let miss = appts.find("specialty", "psicologia").unwrap_err();
    assert_eq!(miss.status, 404);
    assert_eq!(miss.body.erro, "Nenhum agendamento encontrado com esse nome");
    let miss = appts.find("date", "2025").unwrap_err();
    assert_eq!(miss.status, 404);
    assert_eq!(miss.body.erro, "Agendamento não encontrado");
}

#[test]
fn users_username_prefix() {
    let (_dir, catalog) = catalog();
    let users = catalog.resource(Resource::Users);
    users.create(json!({"username": "ana.souza"})).unwrap();
    users.create(json!({"username": "anabela"})).unwrap();
    users.create(json!({"username": "bruno"})).unwrap();

    assert_eq!(users.find("username", "ana").unwrap().body.as_array().unwrap().len(), 2);
    assert_eq!(users.find("username", "Ana").unwrap_err().body.erro, "Usuário não encontrado");
}

#[test]
fn unknown_query_route_is_404() {
    let (_dir, catalog) = catalog();
    let students = catalog.resource(Resource::Students);
    students.create(json!({"name": "Eragon"})).unwrap();
    let rejection = students.find("name", "Eragon").unwrap_err();
    assert_eq!(rejection.status, 404);
}

// ---- persistence failures ---------------------------------------------------

#[test]
fn save_failure_is_500_with_resource_message() {
    let (dir, catalog) = catalog();
    let users = catalog.resource(Resource::Users);
    users.create(json!({"name": "Ana"})).unwrap();

    let path = dir.path().join("users.json");
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let rejection = users.create(json!({"name": "Bia"})).unwrap_err();
    assert_eq!(rejection.status, 500);
    assert_eq!(rejection.body.erro, "Erro ao salvar o usuário");
    assert!(rejection.cause.is_persistence());

    // memory kept the record
    assert_eq!(users.list().unwrap().body.as_array().unwrap().len(), 2);
}

#[test]
fn save_failure_messages_per_resource_and_operation() {
    let cases = [
        (Resource::Teachers, ["Erro ao salvar o(a) professor(a)"; 3]),
        (Resource::Students, ["Erro ao salvar o aluno"; 3]),
        (Resource::Professionals, ["Erro ao salvar o profissional"; 3]),
        (Resource::Events, ["Erro ao salvar evento!"; 3]),
        (Resource::Appointments, ["Erro ao salvar o agendamento"; 3]),
        (
            Resource::Users,
            [
                "Erro ao salvar o usuário",
                "Erro ao salvar o usuário",
                "Erro ao salvar as alterações",
            ],
        ),
    ];

    for (resource, [on_create, on_update, on_delete]) in cases {
        let (dir, catalog) = catalog();
        let store = catalog.resource(resource);
        let id = id_of(&store.create(json!({"name": "Ana"})).unwrap().body);

        let path = dir.path().join(resource.file_name());
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let outcomes = [
            (store.create(json!({"name": "Bia"})).unwrap_err(), on_create),
            (store.update(&id, json!({"name": "Ana Paula"})).unwrap_err(), on_update),
            (store.delete(&id).unwrap_err(), on_delete),
        ];
        for (rejection, message) in outcomes {
            assert_eq!(rejection.status, 500, "{resource}");
            assert_eq!(rejection.body.erro, message, "{resource}");
            assert!(rejection.cause.is_persistence(), "{resource}");
        }
    }
}
