use lazyform_core::db::{open_db, open_db_in_memory};
use lazyform_core::{
    FieldDescriptor, FieldSettings, FieldType, Schema, SchemaProvider, SchemaRepoError,
    SimplifiedSchema, SqliteSchemaRepository,
};

fn task_schema() -> Schema {
    Schema::new()
        .with_field("title", FieldDescriptor::new(FieldType::String).required())
        .with_field(
            "priority",
            FieldDescriptor::new(FieldType::Enum).with_options(["low", "high"]),
        )
}

#[test]
fn upsert_and_get_schema_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchemaRepository::new(&conn);

    repo.upsert_schema("task", Some("Task"), &task_schema()).unwrap();

    let stored = repo.get_schema("task").unwrap().unwrap();
    assert_eq!(stored.data_type, "task");
    assert_eq!(stored.display_name.as_deref(), Some("Task"));
    assert_eq!(stored.schema, task_schema());
    assert!(stored.updated_at > 0);
}

#[test]
fn upsert_replaces_existing_schema() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchemaRepository::new(&conn);

    repo.upsert_schema("task", None, &task_schema()).unwrap();
    let replacement = Schema::new().with_field("done", FieldDescriptor::new(FieldType::Boolean));
    repo.upsert_schema("task", Some("Chore"), &replacement).unwrap();

    let stored = repo.get_schema("task").unwrap().unwrap();
    assert_eq!(stored.schema, replacement);
    assert_eq!(stored.display_name.as_deref(), Some("Chore"));
    assert_eq!(repo.list_data_types().unwrap(), vec!["task".to_string()]);
}

#[test]
fn invalid_data_type_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchemaRepository::new(&conn);

    let err = repo.upsert_schema("9 lives", None, &task_schema()).unwrap_err();
    assert!(matches!(err, SchemaRepoError::InvalidDataType(_)));
}

#[test]
fn preset_requires_existing_schema() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchemaRepository::new(&conn);
    let preset = SimplifiedSchema::new()
        .with_settings("priority", FieldSettings::new().with_options(["high"]));

    let err = repo.upsert_preset("task", "triage", &preset).unwrap_err();
    assert!(matches!(err, SchemaRepoError::NotFound(_)));

    repo.upsert_schema("task", None, &task_schema()).unwrap();
    repo.upsert_preset("task", "triage", &preset).unwrap();
    assert_eq!(repo.get_preset("task", "triage").unwrap(), Some(preset));
    assert_eq!(repo.list_presets("task").unwrap(), vec!["triage".to_string()]);
}

#[test]
fn deleting_schema_cascades_presets() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchemaRepository::new(&conn);
    repo.upsert_schema("task", None, &task_schema()).unwrap();
    repo.upsert_preset(
        "task",
        "triage",
        &SimplifiedSchema::new().with_settings("title", FieldSettings::new().with_label("Name")),
    )
    .unwrap();

    repo.delete_schema("task").unwrap();
    assert!(repo.get_schema("task").unwrap().is_none());
    assert!(repo.list_presets("task").unwrap().is_empty());
    assert!(matches!(
        repo.delete_schema("task"),
        Err(SchemaRepoError::NotFound(_))
    ));
}

#[test]
fn load_registry_serves_schemas_and_presets() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchemaRepository::new(&conn);
    repo.upsert_schema("task", Some("Task"), &task_schema()).unwrap();
    repo.upsert_schema("timeLog", None, &Schema::new()).unwrap();
    repo.upsert_preset(
        "task",
        "triage",
        &SimplifiedSchema::new().with_settings("priority", FieldSettings::new().required(true)),
    )
    .unwrap();

    let registry = repo.load_registry().unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.schema("task"), Some(task_schema()));
    assert_eq!(registry.display_name("task").as_deref(), Some("Task"));
    assert!(registry.preset("task", "triage").is_some());
    assert!(registry.preset("task", "missing").is_none());
}

#[test]
fn repository_acts_as_schema_provider() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemas.sqlite3");
    {
        let conn = open_db(&path).unwrap();
        SqliteSchemaRepository::new(&conn)
            .upsert_schema("task", None, &task_schema())
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteSchemaRepository::new(&conn);
    assert_eq!(repo.schema("task"), Some(task_schema()));
    assert_eq!(repo.schema("note"), None);
    assert_eq!(repo.schema("not valid"), None);
    assert_eq!(repo.display_name("task"), None);
    assert_eq!(repo.display_name("not valid"), None);
}

#[test]
fn stored_schema_keeps_host_defined_properties() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchemaRepository::new(&conn);
    let schema: Schema = serde_json::from_value(serde_json::json!({
        "title": {"type": "string", "placeholder": "What needs doing?"}
    }))
    .unwrap();

    repo.upsert_schema("task", None, &schema).unwrap();

    let stored = repo.get_schema("task").unwrap().unwrap();
    assert_eq!(
        stored.schema.field("title").unwrap().extra["placeholder"],
        serde_json::json!("What needs doing?")
    );
}
