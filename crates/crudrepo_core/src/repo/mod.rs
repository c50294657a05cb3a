//! Repository layer: CRUD contract, error mapping and validating wrappers.
//!
//! # Responsibility
//! - Expose the five CRUD operations over any store.
//! - Convert every store failure into an `OperationError` value.
//!
//! # Invariants
//! - Local precondition failures are reported before any store call.
//! - Errors never propagate as panics past this layer.
//! - Wrappers add validation around delegated calls and never bypass the
//!   base error mapping.

pub mod base_repo;
pub mod error;
pub mod role_repo;
pub mod uuid_repo;
