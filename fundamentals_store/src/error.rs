//! Error taxonomy of the store.
//!
//! - [`ValidationError`]: one input row is malformed. Row-scoped: the row is
//!   skipped and the batch continues.
//! - [`StoreError`]: the database refused or failed. Fatal for the current
//!   ticker run; the unit of work rolls back and the error propagates.

use fundamentals_ingestor::models::{estimate::FiscalYearError, period::UnknownPeriodType};
use thiserror::Error;

/// Result type used throughout the store for fallible operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A single input row failed shape validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Ticker is empty after trimming.
    #[error("ticker is empty")]
    EmptyTicker,
    /// Peer ticker is empty after trimming.
    #[error("peer ticker is empty")]
    EmptyPeerTicker,
    /// Period type outside `{annual, quarter}`.
    #[error(transparent)]
    PeriodType(#[from] UnknownPeriodType),
    /// Fiscal year not coercible to an integer.
    #[error(transparent)]
    FiscalYear(#[from] FiscalYearError),
    /// Price target row without a target price.
    #[error("price target row has no target price")]
    MissingTargetPrice,
}

/// Storage-layer failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or constraint failure reported by the database.
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
    /// Could not open the database.
    #[error("database connection failed: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A payload column could not be encoded or decoded as JSON.
    #[error("payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
    /// Input that must be valid for the whole run (e.g. the host ticker) was not.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
}
