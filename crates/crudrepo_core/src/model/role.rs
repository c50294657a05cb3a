//! Role example entity.
//!
//! # Responsibility
//! - Model an access-control role with per-resource action permissions.
//!
//! # Invariants
//! - `id` is the primary key; role repositories require RFC-4122 text form.
//! - `resource_actions` is persisted as one JSON document.
//! - `created_at` is populated by the store and never written by callers.

use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One named action and whether it is granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub permission: bool,
}

/// Actions granted on a single resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceActions {
    pub resource_id: String,
    pub actions: Vec<Action>,
}

/// Access-control role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub resource_actions: Vec<ResourceActions>,
    /// Unix epoch milliseconds, assigned by the store on first insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Role {
    /// Creates a role with a generated v4 UUID.
    pub fn new(name: impl Into<String>, resource_actions: Vec<ResourceActions>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, resource_actions)
    }

    /// Creates a role with a caller-provided id.
    ///
    /// The id is not validated here; `UuidRepository` rejects non-UUID ids
    /// at create time.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_actions: Vec<ResourceActions>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_actions,
            created_at: None,
        }
    }

    /// Returns whether `action` is granted on `resource_id`.
    ///
    /// Unknown resources and actions are denied.
    pub fn allows(&self, resource_id: &str, action: &str) -> bool {
        self.resource_actions
            .iter()
            .filter(|entry| entry.resource_id == resource_id)
            .flat_map(|entry| entry.actions.iter())
            .any(|entry| entry.name == action && entry.permission)
    }
}

impl Entity for Role {
    const FIELDS: &'static [&'static str] = &["id", "name", "resource_actions", "created_at"];

    fn id(&self) -> &str {
        &self.id
    }
}
