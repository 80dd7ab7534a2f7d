//! Fact writers and merge policies.
//!
//! | entity | policy | function |
//! |---|---|---|
//! | metric | append-only | [`metrics::write_metrics`] |
//! | estimate | write-once per `(symbol, fiscal year)` | [`estimates::merge_estimate`] |
//! | peer relation | write-once per `(host, peer ticker)` | [`peers::merge_peer`] |
//! | price target | append-only, aggregates dropped | [`price_targets::write_price_targets`] |
//!
//! Writers never open a transaction of their own; they run inside the caller's
//! [`crate::db::store::Session`].

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;

pub mod estimates;
pub mod metrics;
pub mod peers;
pub mod price_targets;

/// Result of a write-once merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No row existed for the key; one was inserted.
    Inserted,
    /// A row already existed; it was left untouched.
    Skipped,
}

/// The input batch a rejected row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Batch {
    /// Annual statements.
    Annual,
    /// Quarterly statements.
    Quarterly,
    /// Forward estimates.
    Estimates,
    /// Operating peers.
    OperatingPeers,
    /// Trading peers.
    TradingPeers,
    /// Broker price targets.
    PriceTargets,
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Batch::Annual => "annual",
            Batch::Quarterly => "quarterly",
            Batch::Estimates => "estimates",
            Batch::OperatingPeers => "operating_peers",
            Batch::TradingPeers => "trading_peers",
            Batch::PriceTargets => "price_targets",
        })
    }
}

/// A row skipped because it failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    /// Batch the row belongs to.
    pub batch: Batch,
    /// Position of the row in its batch.
    pub index: usize,
    /// Why it was rejected.
    pub reason: ValidationError,
}

/// Counters of a batch of write-once merges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeSummary {
    /// Rows inserted.
    pub inserted: usize,
    /// Rows whose key already existed.
    pub skipped: usize,
    /// Rows rejected by validation.
    pub rejected: Vec<RowRejection>,
}

impl MergeSummary {
    pub(crate) fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted => self.inserted += 1,
            MergeOutcome::Skipped => self.skipped += 1,
        }
    }
}
