//! Record-mapping store adapter.
//!
//! Lets a repository work with a domain type `T` while the underlying store
//! persists a different record shape `U`. Both mapping functions are pure and
//! infallible; failures still come only from the inner store.
//!
//! Order fields arrive as `T` field names. Without a field mapping they reach
//! the inner store unchanged, so `T` and `U` must then share field names.

use crate::store::{DeleteOutcome, FindOptions, OrderBy, Store, StoreError, StoreResult};
use std::borrow::Cow;
use std::marker::PhantomData;

/// `Store<T>` implemented over an inner `Store<U>`.
pub struct MappedStore<S, U, T> {
    inner: S,
    to_store_record: fn(&T) -> U,
    from_store_record: fn(U) -> T,
    to_store_field: Option<fn(&str) -> Option<&'static str>>,
    _marker: PhantomData<fn(U) -> T>,
}

impl<S, U, T> MappedStore<S, U, T> {
    pub fn new(inner: S, to_store_record: fn(&T) -> U, from_store_record: fn(U) -> T) -> Self {
        Self {
            inner,
            to_store_record,
            from_store_record,
            to_store_field: None,
            _marker: PhantomData,
        }
    }

    /// Translates `T` field names to `U` field names for ordering.
    ///
    /// A field the mapping does not know fails the query with
    /// `StoreError::InvalidData`.
    pub fn with_field_names(mut self, to_store_field: fn(&str) -> Option<&'static str>) -> Self {
        self.to_store_field = Some(to_store_field);
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Clone, U, T> Clone for MappedStore<S, U, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            to_store_record: self.to_store_record,
            from_store_record: self.from_store_record,
            to_store_field: self.to_store_field,
            _marker: PhantomData,
        }
    }
}

impl<S, U, T> MappedStore<S, U, T> {
    fn store_options<'a>(&self, options: &'a FindOptions) -> StoreResult<Cow<'a, FindOptions>> {
        let (Some(to_store_field), Some(order)) = (self.to_store_field, options.order_by.as_ref())
        else {
            return Ok(Cow::Borrowed(options));
        };
        let field = to_store_field(&order.field).ok_or_else(|| {
            StoreError::InvalidData(format!("no stored field for order field `{}`", order.field))
        })?;
        Ok(Cow::Owned(FindOptions {
            order_by: Some(OrderBy {
                field: field.to_string(),
                direction: order.direction,
            }),
            ..options.clone()
        }))
    }
}

impl<S: Store<U>, U, T> Store<T> for MappedStore<S, U, T> {
    fn save(&self, record: &T) -> StoreResult<T> {
        let stored = self.inner.save(&(self.to_store_record)(record))?;
        Ok((self.from_store_record)(stored))
    }

    fn find_by_key(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.inner.find_by_key(id)?.map(self.from_store_record))
    }

    fn find_many(&self, options: &FindOptions) -> StoreResult<Vec<T>> {
        let options = self.store_options(options)?;
        Ok(self
            .inner
            .find_many(&options)?
            .into_iter()
            .map(self.from_store_record)
            .collect())
    }

    fn delete_by_key(&self, id: &str) -> StoreResult<DeleteOutcome> {
        self.inner.delete_by_key(id)
    }
}
