//! Store handle, transactional session and dialect-portable id recovery.
//!
//! [`Store`] owns one [`DbConnection`] and the configured [`IdRecovery`]
//! strategy; there is no process-wide engine. All writes of a run happen in
//! [`Store::unit_of_work`], which hands a [`Session`] to the resolvers and
//! writers and commits only when the closure returns `Ok`.
//!
//! New dimension rows report their generated key through
//! [`InsertReturningId`]:
//! - PostgreSQL always uses `INSERT … RETURNING id`.
//! - SQLite uses `RETURNING` when configured ([`IdRecovery::Returning`],
//!   SQLite ≥ 3.35), otherwise inserts and reads back the highest id
//!   ([`IdRecovery::LatestRow`]). The read-back is only sound because the
//!   session holds the database write lock from its first insert until commit
//!   and the SQLite tables use `AUTOINCREMENT`.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    db::{
        connection::{Backend, DbConnection, connect},
        migrate,
    },
    error::StoreResult,
    models::{NewPeriod, NewSymbol},
};

/// How a freshly inserted row's primary key is recovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdRecovery {
    /// Insert, then select the largest id of the table.
    #[default]
    LatestRow,
    /// `INSERT … RETURNING id`.
    Returning,
}

/// Explicit handle over one database connection.
pub struct Store {
    conn: DbConnection,
    sqlite_recovery: IdRecovery,
}

impl Store {
    /// Connect to `database_url`; `sqlite_recovery` only matters for SQLite.
    pub fn open(database_url: &str, sqlite_recovery: IdRecovery) -> StoreResult<Self> {
        Ok(Self::new(connect(database_url)?, sqlite_recovery))
    }

    /// Wrap an already open connection.
    pub fn new(conn: DbConnection, sqlite_recovery: IdRecovery) -> Self {
        Self { conn, sqlite_recovery }
    }

    /// Backend behind this store.
    pub fn backend(&self) -> Backend {
        self.conn.backend()
    }

    /// Strategy actually in effect: PostgreSQL always returns ids directly.
    pub fn id_recovery(&self) -> IdRecovery {
        match self.backend() {
            Backend::Postgres => IdRecovery::Returning,
            Backend::Sqlite => self.sqlite_recovery,
        }
    }

    /// Raw connection, for read-side queries outside a unit of work.
    pub fn connection(&mut self) -> &mut DbConnection {
        &mut self.conn
    }

    /// Apply pending embedded migrations for this backend.
    pub fn migrate(&mut self) -> anyhow::Result<Vec<String>> {
        migrate::run_on(&mut self.conn)
    }

    /// Run `f` inside one transaction.
    ///
    /// Commits when `f` returns `Ok`; rolls back on `Err` or on panic, so
    /// nothing written by `f` is visible after a failure.
    pub fn unit_of_work<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Session<'_>) -> Result<T, E>,
        E: From<diesel::result::Error>,
    {
        let id_recovery = self.id_recovery();
        self.conn.transaction(|conn| {
            let mut session = Session { conn, id_recovery };
            f(&mut session)
        })
    }
}

/// Borrowed in-transaction handle.
pub struct Session<'a> {
    conn: &'a mut DbConnection,
    id_recovery: IdRecovery,
}

impl Session<'_> {
    /// Connection the transaction is open on.
    pub fn conn(&mut self) -> &mut DbConnection {
        self.conn
    }

    /// Id recovery strategy in effect for this session.
    pub fn id_recovery(&self) -> IdRecovery {
        self.id_recovery
    }
}

/// Insert a row and report the primary key the database assigned to it.
pub trait InsertReturningId {
    /// Insert `self` through `session` and return the new row's id.
    fn insert_and_get_id(&self, session: &mut Session<'_>) -> QueryResult<i32>;
}

macro_rules! impl_insert_returning_id {
    ($row:ty, $table:ident) => {
        impl InsertReturningId for $row {
            fn insert_and_get_id(&self, session: &mut Session<'_>) -> QueryResult<i32> {
                use crate::schema::$table::dsl::{$table as target, id};

                let recovery = session.id_recovery();
                match session.conn() {
                    DbConnection::Postgresql(pg) => diesel::insert_into(target)
                        .values(self)
                        .returning(id)
                        .get_result(pg),
                    DbConnection::Sqlite(lite) => match recovery {
                        IdRecovery::Returning => diesel::insert_into(target)
                            .values(self)
                            .returning(id)
                            .get_result(lite),
                        IdRecovery::LatestRow => {
                            diesel::insert_into(target).values(self).execute(lite)?;
                            target.select(id).order(id.desc()).first(lite)
                        }
                    },
                }
            }
        }
    };
}

impl_insert_returning_id!(NewSymbol<'_>, symbols);
impl_insert_returning_id!(NewPeriod<'_>, financial_periods);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::symbols;

    fn memory_store(recovery: IdRecovery) -> Store {
        let mut store = Store::open(":memory:", recovery).expect("open");
        store.migrate().expect("migrate");
        store
    }

    #[test]
    fn both_strategies_return_the_inserted_id() {
        for recovery in [IdRecovery::LatestRow, IdRecovery::Returning] {
            let mut store = memory_store(recovery);
            let (a, b) = store
                .unit_of_work(|session| -> QueryResult<(i32, i32)> {
                    let a = NewSymbol { ticker: "AAA", name: None }.insert_and_get_id(session)?;
                    let b = NewSymbol { ticker: "BBB", name: None }.insert_and_get_id(session)?;
                    Ok((a, b))
                })
                .expect("insert");
            assert_ne!(a, b);

            let stored: i32 = symbols::table
                .filter(symbols::ticker.eq("BBB"))
                .select(symbols::id)
                .first(store.connection())
                .expect("lookup");
            assert_eq!(stored, b, "{recovery:?}");
        }
    }

    #[test]
    fn failed_unit_of_work_rolls_back() {
        let mut store = memory_store(IdRecovery::LatestRow);
        let result: QueryResult<()> = store.unit_of_work(|session| {
            NewSymbol { ticker: "AAA", name: None }.insert_and_get_id(session)?;
            Err(diesel::result::Error::RollbackTransaction)
        });
        assert!(result.is_err());

        let count: i64 = symbols::table.count().get_result(store.connection()).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn sqlite_recovery_is_configurable() {
        assert_eq!(memory_store(IdRecovery::Returning).id_recovery(), IdRecovery::Returning);
        assert_eq!(memory_store(IdRecovery::LatestRow).id_recovery(), IdRecovery::LatestRow);
        assert_eq!(IdRecovery::default(), IdRecovery::LatestRow);
    }
}
