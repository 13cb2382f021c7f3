use json_records::record::fields_from_value;
use json_records::{Collection, MatchMode};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), json_records::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let path = std::env::temp_dir().join("json_records_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let teachers = Collection::open(&path)?;

    // create
    let ana = teachers.create(fields_from_value(json!({"name": "Ana", "subject": "Math"}))?)?;
    teachers.create(fields_from_value(json!({"name": "João Silva", "subject": "History"}))?)?;
    let id = ana.id().unwrap_or_default().to_string();
    println!("created {id}");

    // read
    println!("by id  = {:?}", teachers.get_by_id(&id)?);
    println!("search = {:?}", teachers.find_by_field("name", "joão", MatchMode::ContainsIgnoreCase)?);

    // update keeps the id even if the body tries to change it
    let updated = teachers.update(&id, fields_from_value(json!({"id": "x", "name": "Ana Paula"}))?)?;
    println!("updated = {updated:?}");

    // delete
    teachers.delete(&id)?;
    println!("after delete: {} record(s)", teachers.len());
    println!("{}", std::fs::read_to_string(&path).unwrap_or_default());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
