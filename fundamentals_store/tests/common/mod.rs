#![allow(dead_code)]

use chrono::NaiveDate;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use fundamentals_ingestor::models::{
    Payload,
    dataset::Dataset,
    statement::{StatementBatch, StatementRow},
    period::PeriodType,
};
use fundamentals_store::db::{
    connection::DbConnection,
    migrate,
    store::{IdRecovery, Store},
};
use fundamentals_store::query::{Table, count_rows};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}
#[derive(QueryableByName)]
struct Violations {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn temp_db() -> TestDb {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();
    TestDb { _dir: dir, path }
}

/// Migrated temp-file database plus a store over it.
pub fn setup_store(recovery: IdRecovery) -> (TestDb, Store) {
    let db = temp_db();
    migrate::run_all(&db.path).expect("migrations");
    let store = Store::open(&db.path, recovery).expect("open store");
    (db, store)
}

pub const BOTH_RECOVERIES: [IdRecovery; 2] = [IdRecovery::LatestRow, IdRecovery::Returning];

pub fn sqlite(store: &mut Store) -> &mut SqliteConnection {
    match store.connection() {
        DbConnection::Sqlite(conn) => conn,
        DbConnection::Postgresql(_) => panic!("tests run on sqlite"),
    }
}

pub fn count(store: &mut Store, table: Table) -> i64 {
    count_rows(store.connection(), table).expect("count")
}

pub fn fk_check_empty(store: &mut Store) {
    let v: Violations = diesel::sql_query("SELECT COUNT(*) AS n FROM pragma_foreign_key_check")
        .get_result(sqlite(store))
        .expect("foreign_key_check");
    assert_eq!(v.n, 0, "foreign key violations present");
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal"); // WAL is persistent per DB file

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn payload(entries: &[(&str, Option<f64>)]) -> Payload {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// `ticker` with a single annual period 2022-12-31, revenue = 100.
pub fn single_annual(ticker: &str) -> Dataset {
    let mut ds = Dataset::empty(ticker);
    ds.annual = StatementBatch {
        period_type: PeriodType::Annual,
        rows: vec![StatementRow {
            date: date(2022, 12, 31),
            values: payload(&[("revenue", Some(100.0))]),
        }],
    };
    ds
}
