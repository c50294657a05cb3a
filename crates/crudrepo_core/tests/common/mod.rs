#![allow(dead_code)]

use crudrepo_core::db::{open_db_in_memory, share_connection};
use crudrepo_core::{
    DeleteOutcome, Entity, FindOptions, Repository, SharedConnection, SqlEntity, SqliteStore,
    Store, StoreError, StoreResult,
};
use rusqlite::types::Value;
use rusqlite::Row;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const WIDGET_TABLE_SQL: &str = "CREATE TABLE widgets (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL
);";

/// Minimal entity whose `name` column is required by the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: String,
    pub name: Option<String>,
}

impl Widget {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
        }
    }
}

impl Entity for Widget {
    const FIELDS: &'static [&'static str] = &["id", "name"];

    fn id(&self) -> &str {
        &self.id
    }
}

impl SqlEntity for Widget {
    fn to_sql_values(&self) -> StoreResult<Vec<(&'static str, Value)>> {
        let name = match &self.name {
            Some(name) => Value::Text(name.clone()),
            None => Value::Null,
        };
        Ok(vec![("id", Value::Text(self.id.clone())), ("name", name)])
    }

    fn from_row(row: &Row<'_>) -> StoreResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

/// Store wrapper counting primitive calls.
pub struct RecordingStore<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T, S: Store<T>> Store<T> for RecordingStore<S> {
    fn save(&self, record: &T) -> StoreResult<T> {
        self.record();
        self.inner.save(record)
    }

    fn find_by_key(&self, id: &str) -> StoreResult<Option<T>> {
        self.record();
        self.inner.find_by_key(id)
    }

    fn find_many(&self, options: &FindOptions) -> StoreResult<Vec<T>> {
        self.record();
        self.inner.find_many(options)
    }

    fn delete_by_key(&self, id: &str) -> StoreResult<DeleteOutcome> {
        self.record();
        self.inner.delete_by_key(id)
    }
}

pub type WidgetStore = SqliteStore<Widget>;
pub type RecordedWidgetRepository = Repository<Widget, Arc<RecordingStore<WidgetStore>>>;

/// Migrated in-memory database with an extra `widgets` table.
pub fn widget_connection() -> SharedConnection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(WIDGET_TABLE_SQL).unwrap();
    share_connection(conn)
}

pub fn widget_repository(conn: &SharedConnection) -> Repository<Widget, WidgetStore> {
    let store = SqliteStore::try_new(conn.clone(), "widgets").unwrap();
    Repository::new(store, "Widget")
}

pub fn recorded_widget_repository(
    conn: &SharedConnection,
) -> (RecordedWidgetRepository, Arc<RecordingStore<WidgetStore>>) {
    let store = Arc::new(RecordingStore::new(
        SqliteStore::try_new(conn.clone(), "widgets").unwrap(),
    ));
    (Repository::new(store.clone(), "Widget"), store)
}

pub fn drop_table(conn: &SharedConnection, table: &str) {
    conn.lock()
        .unwrap()
        .execute_batch(&format!("DROP TABLE {table};"))
        .unwrap();
}

pub fn assert_db_error(err: &StoreError) {
    assert!(matches!(err, StoreError::Db(_)), "unexpected error: {err}");
}
