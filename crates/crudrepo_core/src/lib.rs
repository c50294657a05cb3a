//! Generic CRUD repositories over a pluggable store.
//!
//! Callers go through `CrudService` (optional) to a `CrudRepository`
//! implementation, which delegates to a `Store`. Failures come back as
//! `OperationError` values with a closed `ErrorKind`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, Settings};
pub use db::{DbError, SharedConnection};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget};
pub use model::entity::Entity;
pub use model::role::{Action, ResourceActions, Role};
pub use repo::base_repo::{CrudRepository, Repository};
pub use repo::error::{ErrorKind, OperationError, OperationResult, OperationSuccess};
pub use repo::role_repo::{role_repository, RoleRepository, RoleStore, ROLE_RESOURCE, ROLE_TABLE};
pub use repo::uuid_repo::{is_uuid, UuidRepository};
pub use service::crud_service::CrudService;
pub use store::mapped::MappedStore;
pub use store::sqlite::{SqlEntity, SqliteStore};
pub use store::{
    DeleteOutcome, FindOptions, OrderBy, SortDirection, Store, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
