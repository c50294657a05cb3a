//! Use-case services layered over repositories.
//!
//! # Responsibility
//! - Provide the seam where cross-cutting behavior (authorization,
//!   auditing, caching) attaches without changing repository contracts.

pub mod crud_service;
