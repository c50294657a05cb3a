//! Role persistence wiring.
//!
//! # Responsibility
//! - Map `Role` records to rows of the `roles` table.
//! - Assemble the UUID-validating role repository over a shared connection.
//!
//! # Invariants
//! - `resource_actions` round-trips through a JSON text column.
//! - `created_at` is written only when already known, so the store default
//!   applies on first insert and survives updates.

use crate::db::SharedConnection;
use crate::model::role::Role;
use crate::repo::base_repo::Repository;
use crate::repo::uuid_repo::UuidRepository;
use crate::store::sqlite::{SqlEntity, SqliteStore};
use crate::store::{StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::Row;

/// Table created by the bundled migrations.
pub const ROLE_TABLE: &str = "roles";
/// Resource name used in role error messages.
pub const ROLE_RESOURCE: &str = "Role";

pub type RoleStore = SqliteStore<Role>;
pub type RoleRepository = UuidRepository<Repository<Role, RoleStore>>;

/// Builds the role repository on `conn`.
pub fn role_repository(conn: SharedConnection) -> StoreResult<RoleRepository> {
    let store = SqliteStore::try_new(conn, ROLE_TABLE)?;
    Ok(UuidRepository::new(Repository::new(store, ROLE_RESOURCE)))
}

impl SqlEntity for Role {
    fn to_sql_values(&self) -> StoreResult<Vec<(&'static str, Value)>> {
        let mut values = vec![
            ("id", Value::Text(self.id.clone())),
            ("name", Value::Text(self.name.clone())),
            (
                "resource_actions",
                Value::Text(serde_json::to_string(&self.resource_actions)?),
            ),
        ];
        if let Some(created_at) = self.created_at {
            values.push(("created_at", Value::Integer(created_at)));
        }
        Ok(values)
    }

    fn from_row(row: &Row<'_>) -> StoreResult<Self> {
        let raw_actions: String = row.get("resource_actions")?;
        let resource_actions = serde_json::from_str(&raw_actions).map_err(|err| {
            StoreError::InvalidData(format!(
                "invalid json in roles.resource_actions: {err}"
            ))
        })?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            resource_actions,
            created_at: row.get("created_at")?,
        })
    }
}
