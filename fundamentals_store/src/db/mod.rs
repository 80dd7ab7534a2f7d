//! Database access: backend detection, connections, migrations, store handle.
//!
//! - [`connection`]: [`connection::Backend`] detection from the URL marker and
//!   the two-backend [`connection::DbConnection`]. SQLite connections get WAL,
//!   `foreign_keys=ON` and a 5000ms busy timeout.
//! - [`migrate`]: embedded migrations, one set per backend.
//! - [`store`]: [`store::Store`], [`store::Session`] and id recovery.
//!
//! ```no_run
//! use fundamentals_store::db::store::{IdRecovery, Store};
//!
//! let mut store = Store::open("sqlite://financial_data.sqlite", IdRecovery::LatestRow).expect("open");
//! store.migrate().expect("migrations");
//! ```
//!
//! Building with PostgreSQL support requires the system libpq (e.g. libpq-dev on Debian/Ubuntu).

// derive(MultiConnection) emits undocumented backend types
#[allow(missing_docs)]
pub mod connection;
pub mod migrate;
pub mod store;
