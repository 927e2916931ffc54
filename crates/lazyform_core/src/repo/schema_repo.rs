//! Schema store repository on SQLite.
//!
//! # Responsibility
//! - Persist full schemas per data type and named simplified-schema presets.
//! - Load the stored catalog into an in-memory registry for dialogs.
//!
//! # Invariants
//! - Data type ids are validated before any write.
//! - Stored JSON must decode into the typed model; corrupt rows are errors,
//!   not silently skipped.
//! - Deleting a schema removes its presets (`ON DELETE CASCADE`).

use crate::db::DbError;
use crate::model::schema::{Schema, SimplifiedSchema};
use crate::schema::registry::{
    normalize_data_type, InMemorySchemaRegistry, SchemaProvider, SchemaRegistryError,
};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SchemaRepoResult<T> = Result<T, SchemaRepoError>;

/// Errors from schema store persistence.
#[derive(Debug)]
pub enum SchemaRepoError {
    InvalidDataType(String),
    InvalidPresetName(String),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for SchemaRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDataType(value) => write!(f, "data type is invalid: {value}"),
            Self::InvalidPresetName(value) => write!(f, "preset name is invalid: {value}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(data_type) => write!(f, "schema not found: {data_type}"),
            Self::InvalidData(message) => write!(f, "invalid stored schema data: {message}"),
        }
    }
}

impl Error for SchemaRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SchemaRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SchemaRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<SchemaRegistryError> for SchemaRepoError {
    fn from(value: SchemaRegistryError) -> Self {
        match value {
            SchemaRegistryError::InvalidDataType(data_type) => Self::InvalidDataType(data_type),
            SchemaRegistryError::DuplicateDataType(data_type) => {
                Self::InvalidData(format!("duplicate data type `{data_type}`"))
            }
            SchemaRegistryError::DataTypeNotFound(data_type) => Self::NotFound(data_type),
        }
    }
}

/// One stored schema row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSchema {
    pub data_type: String,
    pub display_name: Option<String>,
    pub schema: Schema,
    pub updated_at: i64,
}

/// SQLite-backed schema store.
pub struct SqliteSchemaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSchemaRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts or replaces the schema for `data_type`.
    pub fn upsert_schema(
        &self,
        data_type: &str,
        display_name: Option<&str>,
        schema: &Schema,
    ) -> SchemaRepoResult<()> {
        let data_type = normalize_data_type(data_type)?;
        let schema_json = serde_json::to_string(schema)
            .map_err(|err| SchemaRepoError::InvalidData(err.to_string()))?;
        let display_name = display_name
            .map(str::trim)
            .filter(|value| !value.is_empty());

        self.conn.execute(
            "INSERT INTO form_schemas (data_type, display_name, schema_json)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (data_type) DO UPDATE SET
                display_name = excluded.display_name,
                schema_json = excluded.schema_json,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![data_type, display_name, schema_json],
        )?;
        info!(
            "event=schema_repo_upsert module=repo status=ok data_type={} fields={}",
            data_type,
            schema.len()
        );
        Ok(())
    }

    /// Gets one stored schema.
    pub fn get_schema(&self, data_type: &str) -> SchemaRepoResult<Option<StoredSchema>> {
        let data_type = normalize_data_type(data_type)?;
        let row = self
            .conn
            .query_row(
                "SELECT data_type, display_name, schema_json, updated_at
                 FROM form_schemas
                 WHERE data_type = ?1;",
                [data_type.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(data_type, display_name, schema_json, updated_at)| {
            Ok(StoredSchema {
                schema: decode_schema(&data_type, &schema_json)?,
                data_type,
                display_name,
                updated_at,
            })
        })
        .transpose()
    }

    /// Lists stored data types in ascending order.
    pub fn list_data_types(&self) -> SchemaRepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT data_type FROM form_schemas ORDER BY data_type ASC;")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut data_types = Vec::new();
        for row in rows {
            data_types.push(row?);
        }
        Ok(data_types)
    }

    /// Deletes one schema together with its presets.
    pub fn delete_schema(&self, data_type: &str) -> SchemaRepoResult<()> {
        let data_type = normalize_data_type(data_type)?;
        let changed = self.conn.execute(
            "DELETE FROM form_schemas WHERE data_type = ?1;",
            [data_type.as_str()],
        )?;
        if changed == 0 {
            return Err(SchemaRepoError::NotFound(data_type));
        }
        info!("event=schema_repo_delete module=repo status=ok data_type={data_type}");
        Ok(())
    }

    /// Inserts or replaces a named preset for an existing schema.
    pub fn upsert_preset(
        &self,
        data_type: &str,
        preset_name: &str,
        preset: &SimplifiedSchema,
    ) -> SchemaRepoResult<()> {
        let data_type = normalize_data_type(data_type)?;
        let preset_name = normalize_preset_name(preset_name)?;
        if !self.schema_exists(&data_type)? {
            return Err(SchemaRepoError::NotFound(data_type));
        }
        let settings_json = serde_json::to_string(preset)
            .map_err(|err| SchemaRepoError::InvalidData(err.to_string()))?;

        self.conn.execute(
            "INSERT INTO schema_presets (data_type, preset_name, settings_json)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (data_type, preset_name) DO UPDATE SET
                settings_json = excluded.settings_json,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![data_type, preset_name, settings_json],
        )?;
        info!(
            "event=schema_repo_preset_upsert module=repo status=ok data_type={} preset={} overrides={}",
            data_type,
            preset_name,
            preset.len()
        );
        Ok(())
    }

    /// Gets one preset.
    pub fn get_preset(
        &self,
        data_type: &str,
        preset_name: &str,
    ) -> SchemaRepoResult<Option<SimplifiedSchema>> {
        let data_type = normalize_data_type(data_type)?;
        let preset_name = normalize_preset_name(preset_name)?;
        let settings_json = self
            .conn
            .query_row(
                "SELECT settings_json FROM schema_presets
                 WHERE data_type = ?1 AND preset_name = ?2;",
                params![data_type, preset_name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        settings_json
            .map(|json| decode_preset(&data_type, &preset_name, &json))
            .transpose()
    }

    /// Lists preset names of one data type in ascending order.
    pub fn list_presets(&self, data_type: &str) -> SchemaRepoResult<Vec<String>> {
        let data_type = normalize_data_type(data_type)?;
        let mut stmt = self.conn.prepare(
            "SELECT preset_name FROM schema_presets
             WHERE data_type = ?1
             ORDER BY preset_name ASC;",
        )?;
        let rows = stmt.query_map([data_type.as_str()], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Loads every stored schema and preset into an in-memory registry.
    pub fn load_registry(&self) -> SchemaRepoResult<InMemorySchemaRegistry> {
        let mut registry = InMemorySchemaRegistry::new();
        let data_types = self.list_data_types()?;
        for data_type in &data_types {
            let Some(stored) = self.get_schema(data_type)? else {
                continue;
            };
            registry.register(&stored.data_type, stored.schema, stored.display_name)?;
            for preset_name in self.list_presets(data_type)? {
                if let Some(preset) = self.get_preset(data_type, &preset_name)? {
                    registry.register_preset(data_type, &preset_name, preset)?;
                }
            }
        }
        info!(
            "event=schema_repo_load module=repo status=ok schemas={}",
            data_types.len()
        );
        Ok(registry)
    }

    fn schema_exists(&self, data_type: &str) -> SchemaRepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM form_schemas WHERE data_type = ?1);",
            [data_type],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl SchemaProvider for SqliteSchemaRepository<'_> {
    fn schema(&self, data_type: &str) -> Option<Schema> {
        match self.get_schema(data_type) {
            Ok(stored) => stored.map(|stored| stored.schema),
            Err(err) => {
                error!(
                    "event=schema_resolve module=repo status=error data_type={} error={}",
                    data_type.trim(),
                    err
                );
                None
            }
        }
    }

    fn display_name(&self, data_type: &str) -> Option<String> {
        match self.get_schema(data_type) {
            Ok(stored) => stored.and_then(|stored| stored.display_name),
            Err(err) => {
                error!(
                    "event=schema_resolve module=repo status=error data_type={} error={}",
                    data_type.trim(),
                    err
                );
                None
            }
        }
    }

    fn preset(&self, data_type: &str, preset_name: &str) -> Option<SimplifiedSchema> {
        match self.get_preset(data_type, preset_name) {
            Ok(preset) => preset,
            Err(err) => {
                error!(
                    "event=schema_resolve module=repo status=error data_type={} preset={} error={}",
                    data_type.trim(),
                    preset_name.trim(),
                    err
                );
                None
            }
        }
    }
}

fn normalize_preset_name(value: &str) -> SchemaRepoResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchemaRepoError::InvalidPresetName(value.to_string()));
    }
    Ok(trimmed.to_string())
}

fn decode_schema(data_type: &str, json: &str) -> SchemaRepoResult<Schema> {
    serde_json::from_str(json).map_err(|err| {
        SchemaRepoError::InvalidData(format!(
            "form_schemas.schema_json for `{data_type}`: {err}"
        ))
    })
}

fn decode_preset(
    data_type: &str,
    preset_name: &str,
    json: &str,
) -> SchemaRepoResult<SimplifiedSchema> {
    serde_json::from_str(json).map_err(|err| {
        SchemaRepoError::InvalidData(format!(
            "schema_presets.settings_json for `{data_type}/{preset_name}`: {err}"
        ))
    })
}
