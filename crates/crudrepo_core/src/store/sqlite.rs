//! SQLite-backed store.
//!
//! # Responsibility
//! - Implement store primitives for any `SqlEntity` over one table.
//! - Keep SQL text generation inside the persistence boundary.
//!
//! # Invariants
//! - Table, column and ordering names are plain identifiers checked before
//!   they are spliced into SQL; values are always bound parameters.
//! - `save` reads the record back inside the same connection lock, so the
//!   returned value reflects store-populated defaults.
//! - Without explicit ordering, results are sorted by primary key ascending.

use crate::db::SharedConnection;
use crate::model::entity::Entity;
use crate::store::{DeleteOutcome, FindOptions, Store, StoreError, StoreResult};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::marker::PhantomData;

static SQL_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Entity with a row mapping for `SqliteStore`.
pub trait SqlEntity: Entity {
    /// Column/value pairs written by `save`.
    ///
    /// Must include the primary key column. Columns filled by the store
    /// itself (defaults) may be omitted; omitted columns keep their stored
    /// value on update.
    fn to_sql_values(&self) -> StoreResult<Vec<(&'static str, Value)>>;

    /// Decodes one row selected with `Self::FIELDS` as column list.
    fn from_row(row: &Row<'_>) -> StoreResult<Self>;
}

/// Store bound to one table of a shared SQLite connection.
pub struct SqliteStore<T> {
    conn: SharedConnection,
    table: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SqliteStore<T> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            table: self.table.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: SqlEntity> SqliteStore<T> {
    /// Binds a store to `table` after checking that the table carries every
    /// field declared by `T`.
    pub fn try_new(conn: SharedConnection, table: impl Into<String>) -> StoreResult<Self> {
        let table = table.into();
        ensure_identifier(&table)?;
        for field in T::FIELDS {
            ensure_identifier(field)?;
        }

        let store = Self {
            conn,
            table,
            _marker: PhantomData,
        };
        store.with_conn(|conn| ensure_table_ready::<T>(conn, &store.table))?;
        Ok(store)
    }

    /// Table this store reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Shared connection handle backing this store.
    pub fn connection(&self) -> &SharedConnection {
        &self.conn
    }

    fn with_conn<R>(&self, f: impl FnOnce(&Connection) -> StoreResult<R>) -> StoreResult<R> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| StoreError::ConnectionPoisoned)?;
        f(&guard)
    }

    fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", T::FIELDS.join(", "), self.table)
    }

    fn select_by_key(&self, conn: &Connection, id: &str) -> StoreResult<Option<T>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE {} = ?1;",
            self.select_sql(),
            T::ID_FIELD
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(T::from_row(row)?));
        }
        Ok(None)
    }
}

impl<T: SqlEntity> Store<T> for SqliteStore<T> {
    fn save(&self, record: &T) -> StoreResult<T> {
        let values = record.to_sql_values()?;
        let columns: Vec<&'static str> = values.iter().map(|(column, _)| *column).collect();
        if !columns.contains(&T::ID_FIELD) {
            return Err(StoreError::InvalidData(format!(
                "record for `{}` has no `{}` value",
                self.table,
                T::ID_FIELD
            )));
        }
        for column in &columns {
            ensure_identifier(column)?;
        }

        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = columns
            .iter()
            .filter(|column| **column != T::ID_FIELD)
            .map(|column| format!("{column} = excluded.{column}"))
            .collect::<Vec<_>>();
        let on_conflict = if assignments.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", assignments.join(", "))
        };
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {};",
            self.table,
            columns.join(", "),
            placeholders,
            T::ID_FIELD,
            on_conflict
        );

        self.with_conn(|conn| {
            conn.execute(&sql, params_from_iter(values.into_iter().map(|(_, v)| v)))?;
            self.select_by_key(conn, record.id())?.ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "saved record `{}` missing from `{}` on read-back",
                    record.id(),
                    self.table
                ))
            })
        })
    }

    fn find_by_key(&self, id: &str) -> StoreResult<Option<T>> {
        self.with_conn(|conn| self.select_by_key(conn, id))
    }

    fn find_many(&self, options: &FindOptions) -> StoreResult<Vec<T>> {
        let mut sql = self.select_sql();
        let mut bind_values: Vec<Value> = Vec::new();

        match options.order_by.as_ref() {
            Some(order) => {
                if !T::has_field(&order.field) {
                    return Err(StoreError::InvalidData(format!(
                        "unknown order field `{}` for `{}`",
                        order.field, self.table
                    )));
                }
                sql.push_str(&format!(
                    " ORDER BY {} {}, {} ASC",
                    order.field,
                    order.direction.as_sql(),
                    T::ID_FIELD
                ));
            }
            None => sql.push_str(&format!(" ORDER BY {} ASC", T::ID_FIELD)),
        }

        let offset = options.skip.unwrap_or(0);
        if let Some(limit) = options.take {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(offset)));
            }
        } else if offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(offset)));
        }

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(T::from_row(row)?);
            }
            Ok(records)
        })
    }

    fn delete_by_key(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1;", self.table, T::ID_FIELD);
        self.with_conn(|conn| {
            let affected = conn.execute(&sql, [id])?;
            Ok(DeleteOutcome { affected })
        })
    }
}

fn ensure_identifier(value: &str) -> StoreResult<()> {
    if SQL_IDENTIFIER_RE.is_match(value) {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(value.to_string()))
    }
}

fn ensure_table_ready<T: Entity>(conn: &Connection, table: &str) -> StoreResult<()> {
    if !table_exists(conn, table)? {
        return Err(StoreError::MissingRequiredTable(table.to_string()));
    }

    for &column in T::FIELDS {
        if !table_has_column(conn, table, column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: table.to_string(),
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
