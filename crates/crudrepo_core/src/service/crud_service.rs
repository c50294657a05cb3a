//! Pass-through CRUD service.
//!
//! # Invariants
//! - Every operation forwards its arguments unchanged and returns the
//!   repository result unchanged.

use crate::repo::base_repo::CrudRepository;
use crate::repo::error::{OperationResult, OperationSuccess};
use crate::store::FindOptions;

/// Service facade over any `CrudRepository`.
pub struct CrudService<R: CrudRepository> {
    repo: R,
}

impl<R: CrudRepository> CrudService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

/// Services are repositories themselves, so they stack over other services
/// or wrappers.
impl<R: CrudRepository> CrudRepository for CrudService<R> {
    type Record = R::Record;

    fn create(&self, data: &R::Record) -> OperationResult<R::Record> {
        self.repo.create(data)
    }

    fn find_one(&self, id: &str) -> OperationResult<R::Record> {
        self.repo.find_one(id)
    }

    fn find(&self, options: &FindOptions) -> OperationResult<Vec<R::Record>> {
        self.repo.find(options)
    }

    fn update(&self, data: &R::Record) -> OperationResult<OperationSuccess> {
        self.repo.update(data)
    }

    fn delete(&self, id: &str) -> OperationResult<OperationSuccess> {
        self.repo.delete(id)
    }
}
