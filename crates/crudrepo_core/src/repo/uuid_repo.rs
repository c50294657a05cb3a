//! UUID-keyed repository wrapper.
//!
//! # Responsibility
//! - Reject records whose primary key is not an RFC-4122 UUID string before
//!   they reach the wrapped repository's `create`.
//!
//! # Invariants
//! - Rejected creates never touch the store.
//! - Every other operation delegates unchanged.

use crate::model::entity::Entity;
use crate::repo::base_repo::CrudRepository;
use crate::repo::error::{ErrorKind, OperationError, OperationResult, OperationSuccess};
use crate::store::FindOptions;
use once_cell::sync::Lazy;
use regex::Regex;

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .expect("valid uuid regex")
});

/// Returns whether `value` is a UUID in canonical hyphenated text form.
pub fn is_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

/// Wraps a repository and requires UUID primary keys on create.
#[derive(Clone)]
pub struct UuidRepository<R> {
    inner: R,
}

impl<R> UuidRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R> CrudRepository for UuidRepository<R>
where
    R: CrudRepository,
    R::Record: Entity,
{
    type Record = R::Record;

    fn create(&self, data: &R::Record) -> OperationResult<R::Record> {
        if !is_uuid(data.id()) {
            return Err(OperationError::new(
                ErrorKind::InvalidId,
                "Id passed is not valid UUID",
            ));
        }
        self.inner.create(data)
    }

    fn find_one(&self, id: &str) -> OperationResult<R::Record> {
        self.inner.find_one(id)
    }

    fn find(&self, options: &FindOptions) -> OperationResult<Vec<R::Record>> {
        self.inner.find(options)
    }

    fn update(&self, data: &R::Record) -> OperationResult<OperationSuccess> {
        self.inner.update(data)
    }

    fn delete(&self, id: &str) -> OperationResult<OperationSuccess> {
        self.inner.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::is_uuid;

    #[test]
    fn accepts_hyphenated_uuids_in_any_case() {
        assert!(is_uuid("a24a6ea4-ce75-4665-a070-57453082c256"));
        assert!(is_uuid("A24A6EA4-CE75-4665-A070-57453082C256"));
        assert!(is_uuid(&uuid::Uuid::new_v4().to_string()));
    }

    #[test]
    fn rejects_other_shapes() {
        for value in [
            "",
            "1",
            "a24a6ea4ce754665a07057453082c256",
            "9b171474-5c41-4fa5-916671bb2bb899d",
            "{a24a6ea4-ce75-4665-a070-57453082c256}",
            "a24a6ea4-ce75-4665-a070-57453082c256 ",
            "g24a6ea4-ce75-4665-a070-57453082c256",
        ] {
            assert!(!is_uuid(value), "{value} must be rejected");
        }
    }
}
