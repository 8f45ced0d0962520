//! Record Store Accessor
//!
//! The store is a single SQLite database holding the `traffic_stops` table.
//! A [`Store`] is only a handle: every call opens its own connection and
//! drops it before returning, on the success and the failure path alike. No
//! connection or transaction outlives a call.
//!
//! ```text
//! execute(sql) → connect → prepare → query → Table
//!                   │          │        │
//!                   └── Connection ─────┴── Query errors
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use checkpoint::store::Store;
//!
//! let store = Store::open("./data/traffic_stops.db")?;
//! let table = store.execute("SELECT country_name, COUNT(*) AS stops FROM traffic_stops GROUP BY country_name")?;
//! println!("{} countries", table.len());
//! # Ok::<(), checkpoint::store::StoreError>(())
//! ```

mod error;
pub mod schema;
mod table;

pub use error::{StoreError, StoreResult};
pub use table::{
    parse_date, parse_time, Column, ColumnType, Table, Value, DATE_FORMAT, TIME_FORMAT,
};

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OpenFlags, Params};
use std::path::{Path, PathBuf};

/// Handle to the SQLite record store
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Handle to a database file, without touching the disk
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open (creating if needed) a database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let created = !path.exists();
        let store = Self { path };
        let conn = store.connect(OpenFlags::SQLITE_OPEN_CREATE)?;
        conn.execute_batch(schema::CREATE_TABLE)?;
        drop(conn);

        if created {
            tracing::warn!(path = %store.path.display(), "Created a new, empty record store");
        }
        tracing::info!(path = %store.path.display(), "Record store ready");
        Ok(store)
    }

    /// Open a database file that must already exist.
    ///
    /// A missing file is a `Connection` error rather than a fresh, empty store.
    pub fn open_existing(path: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self::at(path.as_ref());
        store.with_connection(|conn| {
            conn.execute_batch(schema::CREATE_TABLE)?;
            Ok(())
        })?;
        Ok(store)
    }

    /// Open the store named by the configuration
    pub fn from_config(config: &crate::config::StoreConfig) -> StoreResult<Self> {
        Self::open(&config.database_path)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Only [`Store::open`] passes `SQLITE_OPEN_CREATE`
    fn connect(&self, extra: OpenFlags) -> StoreResult<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX | extra,
        )
        .map_err(|e| StoreError::Connection(format!("{}: {}", self.path.display(), e)))
    }

    /// Run `f` on a fresh connection that is closed when `f` returns
    pub fn with_connection<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T>,
    {
        let mut conn = self.connect(OpenFlags::empty())?;
        f(&mut conn)
    }

    /// Execute a complete query and return its rows
    pub fn execute(&self, sql: &str) -> StoreResult<Table> {
        self.execute_with_params(sql, params![])
    }

    /// Execute a query with bound parameters and return its rows
    pub fn execute_with_params<P: Params>(&self, sql: &str, params: P) -> StoreResult<Table> {
        tracing::debug!(sql = %sql.trim(), "Executing query");
        self.with_connection(|conn| query_table(conn, sql, params))
    }

    /// Execute a statement that returns no rows, giving the number of rows changed
    pub fn execute_statement<P: Params>(&self, sql: &str, params: P) -> StoreResult<usize> {
        self.with_connection(|conn| Ok(conn.execute(sql, params)?))
    }

    /// The whole `traffic_stops` table
    pub fn fetch_all(&self) -> StoreResult<Table> {
        self.execute(schema::SELECT_ALL)
    }

    /// Number of stop records
    pub fn count(&self) -> StoreResult<i64> {
        self.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM traffic_stops", [], |row| row.get(0))?)
        })
    }
}

/// Run a query on an open connection and collect it into a [`Table`]
pub(crate) fn query_table<P: Params>(conn: &Connection, sql: &str, params: P) -> StoreResult<Table> {
    let mut stmt = conn.prepare(sql)?;

    let columns: Vec<(String, Option<String>)> = stmt
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.decl_type().map(str::to_string)))
        .collect();
    let width = columns.len();

    let mut raw_rows = Vec::new();
    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            values.push(row.get::<_, SqlValue>(idx)?);
        }
        raw_rows.push(values);
    }

    Ok(Table::from_sqlite(columns, raw_rows))
}
