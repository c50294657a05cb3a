//! Generic repository over a store.
//!
//! # Responsibility
//! - Validate ids and find options locally.
//! - Delegate to store primitives and map their failures to error kinds.
//!
//! # Invariants
//! - Empty ids and rejected find options never reach the store.
//! - Every store failure becomes an `OperationError` whose `cause` is the
//!   store diagnostic text.
//! - `update`/`delete` acknowledge success without returning the record.

use crate::logging::{sanitize_message, MAX_CAUSE_CHARS};
use crate::model::entity::Entity;
use crate::repo::error::{ErrorKind, OperationError, OperationResult, OperationSuccess};
use crate::store::{FindOptions, Store};
use log::{debug, error};
use std::marker::PhantomData;
use std::time::Instant;

/// CRUD contract shared by repositories, validating wrappers and services.
pub trait CrudRepository {
    type Record;

    /// Persists `data` and returns the stored value.
    fn create(&self, data: &Self::Record) -> OperationResult<Self::Record>;
    /// Loads one record by primary key.
    fn find_one(&self, id: &str) -> OperationResult<Self::Record>;
    /// Lists records matching `options`. An empty list is a success.
    fn find(&self, options: &FindOptions) -> OperationResult<Vec<Self::Record>>;
    /// Upserts `data` by its primary key.
    fn update(&self, data: &Self::Record) -> OperationResult<OperationSuccess>;
    /// Removes one record by primary key.
    fn delete(&self, id: &str) -> OperationResult<OperationSuccess>;
}

/// Repository bound to one store and one resource name.
///
/// The resource name only feeds messages and logs. Holds no per-call state,
/// so one instance can serve concurrent callers whenever the store can.
pub struct Repository<T, S> {
    store: S,
    resource_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S: Clone> Clone for Repository<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            resource_name: self.resource_name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Entity, S: Store<T>> Repository<T, S> {
    pub fn new(store: S, resource_name: impl Into<String>) -> Self {
        Self {
            store,
            resource_name: resource_name.into(),
            _marker: PhantomData,
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn validate_find_options(options: &FindOptions) -> OperationResult<()> {
        if options.take == Some(0) {
            return Err(OperationError::invalid_query());
        }
        if let Some(order) = options.order_by.as_ref() {
            if !T::has_field(&order.field) {
                return Err(OperationError::invalid_query());
            }
        }
        Ok(())
    }

    fn log_outcome<V>(&self, op: &'static str, started_at: Instant, result: &OperationResult<V>) {
        let duration_ms = started_at.elapsed().as_millis();
        let status = outcome_status(result);
        match result {
            Ok(_) => debug!(
                "event=repo_{} module=repo status={} resource={} duration_ms={}",
                op, status, self.resource_name, duration_ms
            ),
            Err(err) => match err.cause.as_deref() {
                Some(cause) => error!(
                    "event=repo_{} module=repo status={} resource={} duration_ms={} error_code={} cause={}",
                    op,
                    status,
                    self.resource_name,
                    duration_ms,
                    err.kind,
                    sanitize_message(cause, MAX_CAUSE_CHARS)
                ),
                None => debug!(
                    "event=repo_{} module=repo status={} resource={} duration_ms={} error_code={}",
                    op, status, self.resource_name, duration_ms, err.kind
                ),
            },
        }
    }
}

/// `rejected` covers every failure decided without a store fault: invalid
/// input, missing records. `error` means the store itself failed.
fn outcome_status<V>(result: &OperationResult<V>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(err) if err.cause.is_some() => "error",
        Err(_) => "rejected",
    }
}

fn is_blank(id: &str) -> bool {
    id.trim().is_empty()
}

impl<T: Entity, S: Store<T>> CrudRepository for Repository<T, S> {
    type Record = T;

    fn create(&self, data: &T) -> OperationResult<T> {
        let started_at = Instant::now();
        let result = self.store.save(data).map_err(|err| {
            OperationError::new(
                ErrorKind::CreateFailed,
                format!("Cannot create {}", self.resource_name),
            )
            .with_cause(err)
        });
        self.log_outcome("create", started_at, &result);
        result
    }

    fn find_one(&self, id: &str) -> OperationResult<T> {
        let started_at = Instant::now();
        let result = if is_blank(id) {
            Err(OperationError::invalid_id())
        } else {
            match self.store.find_by_key(id) {
                Ok(Some(record)) => Ok(record),
                Ok(None) => Err(OperationError::new(
                    ErrorKind::NotFound,
                    format!("{} not found for id: {id}", self.resource_name),
                )),
                Err(err) => Err(OperationError::new(
                    ErrorKind::FindInternalError,
                    format!(
                        "Internal error occured while finding {} id: {id}",
                        self.resource_name
                    ),
                )
                .with_cause(err)),
            }
        };
        self.log_outcome("find_one", started_at, &result);
        result
    }

    fn find(&self, options: &FindOptions) -> OperationResult<Vec<T>> {
        let started_at = Instant::now();
        let result = Self::validate_find_options(options).and_then(|()| {
            self.store.find_many(options).map_err(|err| {
                OperationError::new(
                    ErrorKind::FindInternalError,
                    format!("Internal error occured while finding {}", self.resource_name),
                )
                .with_cause(err)
            })
        });
        self.log_outcome("find", started_at, &result);
        result
    }

    fn update(&self, data: &T) -> OperationResult<OperationSuccess> {
        let started_at = Instant::now();
        let result = self
            .store
            .save(data)
            .map(|_| OperationSuccess::ok())
            .map_err(|err| {
                OperationError::new(
                    ErrorKind::UpdateFailed,
                    format!("Error occured while updating {}", self.resource_name),
                )
                .with_cause(err)
            });
        self.log_outcome("update", started_at, &result);
        result
    }

    fn delete(&self, id: &str) -> OperationResult<OperationSuccess> {
        let started_at = Instant::now();
        let result = if is_blank(id) {
            Err(OperationError::invalid_id())
        } else {
            match self.store.delete_by_key(id) {
                Ok(outcome) if outcome.affected > 0 => Ok(OperationSuccess::ok()),
                Ok(_) => Err(OperationError::new(
                    ErrorKind::DeleteFailed,
                    format!(
                        "Error occured while deleting {} for id: {id}",
                        self.resource_name
                    ),
                )),
                Err(err) => Err(OperationError::new(
                    ErrorKind::DeleteFailed,
                    format!("Internal Error occured while deleting {}", self.resource_name),
                )
                .with_cause(err)),
            }
        };
        self.log_outcome("delete", started_at, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::{is_blank, outcome_status};
    use crate::repo::error::{ErrorKind, OperationError, OperationResult};

    #[test]
    fn blank_ids_include_whitespace_only() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank("1"));
    }

    #[test]
    fn validation_failures_are_logged_as_rejected() {
        let invalid_id: OperationResult<()> = Err(OperationError::invalid_id());
        let invalid_query: OperationResult<()> = Err(OperationError::invalid_query());
        assert_eq!(outcome_status(&invalid_id), "rejected");
        assert_eq!(outcome_status(&invalid_query), "rejected");

        let store_failure: OperationResult<()> = Err(OperationError::new(
            ErrorKind::CreateFailed,
            "Cannot create Role",
        )
        .with_cause("disk I/O"));
        assert_eq!(outcome_status(&store_failure), "error");
        assert_eq!(outcome_status(&Ok(())), "ok");
    }
}
