//! Record types persisted through repositories.
//!
//! # Responsibility
//! - Define the minimal contract a record must satisfy to be managed by a
//!   generic repository.
//! - Ship the `Role` example entity.
//!
//! # Invariants
//! - Every entity is addressed by a string primary key.
//! - Repositories never interpret fields beyond the primary key and the
//!   declared field names.

pub mod entity;
pub mod role;
