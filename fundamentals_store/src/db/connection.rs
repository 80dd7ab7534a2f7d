//! Backend detection and connection helpers.
//!
//! Provides [`connect`], which picks the backend from the URL, and
//! [`connect_sqlite`], which opens a SQLite connection and applies recommended
//! PRAGMAs: WAL journaling, foreign_keys=ON, and a 5000ms busy_timeout.
//!
//! Example:
//! ```no_run
//! use fundamentals_store::db::connection::{Backend, connect};
//!
//! assert_eq!(Backend::detect("postgres://localhost/fundamentals"), Backend::Postgres);
//! let _conn = connect("sqlite://financial_data.sqlite").expect("open sqlite");
//! ```

use diesel::{Connection, PgConnection, RunQueryDsl, SqliteConnection, sql_query};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Connection to either supported backend.
///
/// Queries written against this type run on both; backend-specific SQL
/// (e.g. `RETURNING`) matches on the variant and uses the inner connection.
#[derive(diesel::MultiConnection)]
pub enum DbConnection {
    /// Server, multi-writer.
    Postgresql(PgConnection),
    /// Embedded, single-writer.
    Sqlite(SqliteConnection),
}

impl DbConnection {
    /// Which backend this connection talks to.
    pub fn backend(&self) -> Backend {
        match self {
            DbConnection::Postgresql(_) => Backend::Postgres,
            DbConnection::Sqlite(_) => Backend::Sqlite,
        }
    }
}

/// The two store engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Embedded single-writer database.
    Sqlite,
    /// Server multi-writer database.
    Postgres,
}

impl Backend {
    /// Detect the backend from a connection string marker.
    ///
    /// `postgres://` and `postgresql://` select PostgreSQL; everything else
    /// (`sqlite://…`, `sqlite:…`, a bare path, `:memory:`) is SQLite.
    pub fn detect(database_url: &str) -> Self {
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            Backend::Postgres
        } else {
            Backend::Sqlite
        }
    }
}

/// Strip a `sqlite://` or `sqlite:` scheme, leaving what SQLite itself accepts.
pub fn sqlite_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> StoreResult<SqliteConnection> {
    let mut conn = SqliteConnection::establish(sqlite_path(database_url))?;

    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    Ok(conn)
}

/// Open a connection to whichever backend the URL names.
pub fn connect(database_url: &str) -> StoreResult<DbConnection> {
    match Backend::detect(database_url) {
        Backend::Postgres => Ok(DbConnection::Postgresql(PgConnection::establish(database_url)?)),
        Backend::Sqlite => Ok(DbConnection::Sqlite(connect_sqlite(database_url)?)),
    }
}
