//! Ingestion orchestrator.
//!
//! One run per ticker:
//! `fetch → resolve symbol → {periods + metrics, estimates, peers, price targets} → commit`.
//!
//! [`fetch_dataset`] is async and talks to the provider; [`ingest_dataset`] is
//! synchronous and performs every write of the run inside one
//! [`Store::unit_of_work`]. A storage error anywhere rolls the whole run back.
//! Row-level validation failures do not; they are collected in the
//! [`IngestReport`].

use fundamentals_ingestor::{
    models::{dataset::Dataset, peer::PeerKind},
    providers::{FundamentalsProvider, ProviderError},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    db::store::{Session, Store},
    error::{StoreError, StoreResult},
    resolve::{backfill_symbol_name, normalize_ticker, resolve_period, resolve_symbol},
    writers::{
        MergeSummary, RowRejection, estimates::merge_estimates, metrics::write_metrics, peers::merge_peers,
        price_targets::{PriceTargetSummary, write_price_targets},
    },
};

pub mod fetch;
pub mod placeholder;

pub use fetch::{FallbackPolicy, FetchOptions, fetch_dataset, fetch_dataset_on};

/// Failure of a full ticker run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A batch could not be fetched and no fallback was allowed.
    #[error("fetching {what} for {ticker} failed")]
    Fetch {
        /// Which batch.
        what: &'static str,
        /// Host ticker.
        ticker: String,
        /// Provider error.
        source: ProviderError,
    },
    /// A dataset file belongs to another ticker than the one requested.
    #[error("dataset is for {found}, not {requested}")]
    TickerMismatch {
        /// Normalized ticker asked for.
        requested: String,
        /// Normalized ticker the dataset carries.
        found: String,
    },
    /// The store failed; nothing from the run was committed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What one committed run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Normalized host ticker.
    pub ticker: String,
    /// Id of the host symbol.
    pub symbol_id: i32,
    /// Statement rows processed (annual + quarterly).
    pub statement_rows: usize,
    /// Metric rows inserted.
    pub metrics_written: usize,
    /// Estimate merges.
    pub estimates: MergeSummary,
    /// Operating peer merges.
    pub operating_peers: MergeSummary,
    /// Trading peer merges.
    pub trading_peers: MergeSummary,
    /// Price-target writes.
    pub price_targets: PriceTargetSummary,
}

impl IngestReport {
    /// Every row skipped for validation reasons, across all batches.
    pub fn rejected(&self) -> impl Iterator<Item = &RowRejection> {
        self.estimates
            .rejected
            .iter()
            .chain(&self.operating_peers.rejected)
            .chain(&self.trading_peers.rejected)
            .chain(&self.price_targets.rejected)
    }
}

/// Write `dataset` in a single transaction.
pub fn ingest_dataset(store: &mut Store, dataset: &Dataset) -> StoreResult<IngestReport> {
    let report = store.unit_of_work(|session| ingest_in_session(session, dataset))?;

    let rejected = report.rejected().count();
    if rejected > 0 {
        warn!(ticker = %report.ticker, rejected, "some rows were rejected");
    }
    info!(
        ticker = %report.ticker,
        symbol_id = report.symbol_id,
        metrics = report.metrics_written,
        estimates = report.estimates.inserted,
        operating_peers = report.operating_peers.inserted,
        trading_peers = report.trading_peers.inserted,
        price_targets = report.price_targets.inserted,
        "committed ingestion run"
    );
    Ok(report)
}

/// [`ingest_dataset`] for a dataset loaded from outside the provider: refused
/// unless it carries `ticker` (compared after normalization).
pub fn ingest_dataset_for(store: &mut Store, ticker: &str, dataset: &Dataset) -> Result<IngestReport, IngestError> {
    let requested = normalize_ticker(ticker).map_err(StoreError::from)?;
    let found = normalize_ticker(&dataset.ticker).map_err(StoreError::from)?;
    if requested != found {
        return Err(IngestError::TickerMismatch { requested, found });
    }
    Ok(ingest_dataset(store, dataset)?)
}

fn ingest_in_session(session: &mut Session<'_>, dataset: &Dataset) -> StoreResult<IngestReport> {
    let symbol_id = resolve_symbol(session, &dataset.ticker)?;
    if let Some(name) = dataset.name.as_deref() {
        backfill_symbol_name(session, symbol_id, name)?;
    }

    let mut report = IngestReport {
        ticker: dataset.ticker.trim().to_uppercase(),
        symbol_id,
        ..Default::default()
    };

    for batch in dataset.statements() {
        for row in &batch.rows {
            let period_id = resolve_period(session, symbol_id, batch.period_type, row.date)?;
            report.metrics_written += write_metrics(session, period_id, &row.values)?;
            report.statement_rows += 1;
        }
    }

    report.estimates = merge_estimates(session, symbol_id, &dataset.estimates)?;
    report.operating_peers = merge_peers(session, symbol_id, PeerKind::Operating, dataset.peers(PeerKind::Operating))?;
    report.trading_peers = merge_peers(session, symbol_id, PeerKind::Trading, dataset.peers(PeerKind::Trading))?;
    report.price_targets = write_price_targets(session, symbol_id, &dataset.price_targets)?;

    Ok(report)
}

/// Fetch then ingest one ticker.
pub async fn run_ticker(
    provider: &dyn FundamentalsProvider,
    store: &mut Store,
    ticker: &str,
    peers: &[String],
    options: &FetchOptions,
) -> Result<IngestReport, IngestError> {
    info!(ticker, peers = peers.len(), fallback = ?options.fallback, "starting ingestion run");
    let dataset = fetch_dataset(provider, ticker, peers, options).await?;
    Ok(ingest_dataset(store, &dataset)?)
}
