//! Embedded schema migrations, one set per backend.
//!
//! The SQLite set uses `INTEGER PRIMARY KEY AUTOINCREMENT` ids, the PostgreSQL
//! set `SERIAL`. Both create the same seven tables.

use anyhow::{Context, anyhow};
use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::db::connection::{Backend, DbConnection, connect_sqlite};

/// SQLite migrations.
pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// PostgreSQL migrations.
pub const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

/// Apply pending migrations to the SQLite database at `url` (path or `sqlite:` URL).
pub fn run_sqlite(url: &str) -> anyhow::Result<()> {
    let mut conn = connect_sqlite(url).with_context(|| format!("open sqlite database {url}"))?;
    conn.run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    Ok(())
}

/// Apply pending migrations to the PostgreSQL database at `url`.
pub fn run_postgres(url: &str) -> anyhow::Result<()> {
    let mut conn = PgConnection::establish(url)?;

    conn.run_pending_migrations(POSTGRES_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    Ok(())
}

/// Apply pending migrations, picking the backend from the URL marker.
pub fn run_all(database_url: &str) -> anyhow::Result<()> {
    match Backend::detect(database_url) {
        Backend::Postgres => run_postgres(database_url),
        Backend::Sqlite => run_sqlite(database_url),
    }
}

/// Apply the migration set matching an open connection; returns the applied versions.
pub fn run_on(conn: &mut DbConnection) -> anyhow::Result<Vec<String>> {
    let applied = match conn {
        DbConnection::Postgresql(pg) => pg.run_pending_migrations(POSTGRES_MIGRATIONS),
        DbConnection::Sqlite(lite) => lite.run_pending_migrations(SQLITE_MIGRATIONS),
    }
    .map_err(|e| anyhow!(e))?;

    Ok(applied.into_iter().map(|v| v.to_string()).collect())
}
