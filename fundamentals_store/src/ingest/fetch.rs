//! Fetch stage: pull every batch for one ticker from a provider.
//!
//! The awaits in this module are the only suspension points of a run; the
//! store work that follows is synchronous.

use chrono::{Local, NaiveDate};
use fundamentals_ingestor::{
    models::{
        dataset::Dataset,
        peer::{PeerKind, PeerRow},
        period::PeriodType,
        statement::StatementBatch,
    },
    providers::{FundamentalsProvider, ProviderError},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::StoreError, ingest::IngestError, ingest::placeholder, resolve::normalize_ticker};

/// What to do when a batch cannot be fetched or comes back empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Fetch failures abort the run; empty batches stay empty.
    #[default]
    Disabled,
    /// Failed or empty batches are replaced by fixed placeholder data.
    Placeholder,
}

/// Knobs of the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Fallback behavior.
    pub fallback: FallbackPolicy,
    /// Statements requested per period type.
    pub statement_limit: u32,
    /// Maximum number of peers whose metrics are fetched.
    pub peer_limit: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            fallback: FallbackPolicy::Disabled,
            statement_limit: 5,
            peer_limit: 5,
        }
    }
}

/// Fetch all batches for `ticker`.
///
/// When `peers` is empty the provider's peer list is used. Peer metrics are
/// fetched for at most [`FetchOptions::peer_limit`] peers; a peer whose
/// metrics fail to load is skipped with a warning.
pub async fn fetch_dataset(
    provider: &dyn FundamentalsProvider,
    ticker: &str,
    peers: &[String],
    options: &FetchOptions,
) -> Result<Dataset, IngestError> {
    fetch_dataset_on(provider, ticker, peers, options, Local::now().date_naive()).await
}

/// [`fetch_dataset`] with an explicit date for dated placeholder rows.
pub async fn fetch_dataset_on(
    provider: &dyn FundamentalsProvider,
    ticker: &str,
    peers: &[String],
    options: &FetchOptions,
    today: NaiveDate,
) -> Result<Dataset, IngestError> {
    let ticker = normalize_ticker(ticker).map_err(StoreError::from)?;
    let policy = options.fallback;
    let mut dataset = Dataset::empty(ticker.as_str());

    dataset.annual = settle(
        policy,
        &ticker,
        "annual statements",
        provider
            .fetch_statements(&ticker, PeriodType::Annual, options.statement_limit)
            .await,
        StatementBatch::is_empty,
        placeholder::annual_statements,
    )?;
    dataset.quarterly = settle(
        policy,
        &ticker,
        "quarterly statements",
        provider
            .fetch_statements(&ticker, PeriodType::Quarter, options.statement_limit)
            .await,
        StatementBatch::is_empty,
        placeholder::quarterly_statements,
    )?;
    dataset.estimates = settle(
        policy,
        &ticker,
        "estimates",
        provider.fetch_estimates(&ticker).await,
        Vec::is_empty,
        || placeholder::estimates(today),
    )?;

    let mut peer_list = normalize_peers(peers);
    if peer_list.is_empty() {
        let fetched = settle(
            policy,
            &ticker,
            "peer list",
            provider.fetch_peer_list(&ticker).await,
            Vec::is_empty,
            placeholder::peer_tickers,
        )?;
        peer_list = normalize_peers(&fetched);
    }
    peer_list.truncate(options.peer_limit);

    for peer in &peer_list {
        match provider.fetch_peer_snapshot(peer).await {
            Ok(Some(snapshot)) => {
                dataset.operating_peers.push(PeerRow {
                    peer_ticker: peer.clone(),
                    values: snapshot.operating,
                });
                dataset.trading_peers.push(PeerRow {
                    peer_ticker: peer.clone(),
                    values: snapshot.trading,
                });
            }
            Ok(None) => debug!(%ticker, %peer, "no metrics for peer"),
            Err(err) => warn!(%ticker, %peer, error = %err, "skipping peer, metrics fetch failed"),
        }
    }
    if policy == FallbackPolicy::Placeholder {
        for kind in PeerKind::ALL {
            if dataset.peers(kind).is_empty() {
                warn!(%ticker, batch = %kind, "no peer metrics, using placeholder data");
                *dataset.peers_mut(kind) = match kind {
                    PeerKind::Operating => placeholder::operating_peers(),
                    PeerKind::Trading => placeholder::trading_peers(),
                };
            }
        }
    }

    dataset.price_targets = settle(
        policy,
        &ticker,
        "price targets",
        provider.fetch_price_targets(&ticker).await,
        Vec::is_empty,
        || placeholder::price_targets(today),
    )?;

    Ok(dataset)
}

/// Upper-case, drop blanks and duplicates, keep order.
fn normalize_peers(peers: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(peers.len());
    for peer in peers {
        let peer = peer.trim().to_uppercase();
        if !peer.is_empty() && !out.contains(&peer) {
            out.push(peer);
        }
    }
    out
}

/// Apply the fallback policy to one fetched batch.
fn settle<T>(
    policy: FallbackPolicy,
    ticker: &str,
    what: &'static str,
    fetched: Result<T, ProviderError>,
    is_empty: impl Fn(&T) -> bool,
    placeholder: impl FnOnce() -> T,
) -> Result<T, IngestError> {
    match (policy, fetched) {
        (FallbackPolicy::Disabled, Ok(batch)) => Ok(batch),
        (FallbackPolicy::Disabled, Err(source)) => Err(IngestError::Fetch {
            what,
            ticker: ticker.to_string(),
            source,
        }),
        (FallbackPolicy::Placeholder, Ok(batch)) if !is_empty(&batch) => Ok(batch),
        (FallbackPolicy::Placeholder, Ok(_)) => {
            warn!(%ticker, batch = what, "empty batch, using placeholder data");
            Ok(placeholder())
        }
        (FallbackPolicy::Placeholder, Err(err)) => {
            warn!(%ticker, batch = what, error = %err, "fetch failed, using placeholder data");
            Ok(placeholder())
        }
    }
}
