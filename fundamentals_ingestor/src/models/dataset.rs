//! Everything fetched for one ticker in one run.

use serde::{Deserialize, Serialize};

use crate::models::{
    estimate::EstimateRow,
    peer::{PeerKind, PeerRow},
    period::PeriodType,
    price_target::PriceTargetRow,
    statement::StatementBatch,
};

/// The full input of one ingestion run.
///
/// Every batch may be empty; an empty dataset is valid and only resolves the
/// symbol itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Host ticker as requested (normalized by the store).
    pub ticker: String,
    /// Optional company name, used to backfill the symbol row.
    #[serde(default)]
    pub name: Option<String>,
    /// Annual statements.
    pub annual: StatementBatch,
    /// Quarterly statements.
    pub quarterly: StatementBatch,
    /// Forward estimates.
    #[serde(default)]
    pub estimates: Vec<EstimateRow>,
    /// Operating peers.
    #[serde(default)]
    pub operating_peers: Vec<PeerRow>,
    /// Trading peers.
    #[serde(default)]
    pub trading_peers: Vec<PeerRow>,
    /// Broker price targets, aggregates included.
    #[serde(default)]
    pub price_targets: Vec<PriceTargetRow>,
}

impl Dataset {
    /// A dataset with every batch empty.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
            annual: StatementBatch::empty(PeriodType::Annual),
            quarterly: StatementBatch::empty(PeriodType::Quarter),
            estimates: Vec::new(),
            operating_peers: Vec::new(),
            trading_peers: Vec::new(),
            price_targets: Vec::new(),
        }
    }

    /// Both statement batches, annual first.
    pub fn statements(&self) -> [&StatementBatch; 2] {
        [&self.annual, &self.quarterly]
    }

    /// Peer rows of one kind.
    pub fn peers(&self, kind: PeerKind) -> &[PeerRow] {
        match kind {
            PeerKind::Operating => &self.operating_peers,
            PeerKind::Trading => &self.trading_peers,
        }
    }

    /// Mutable peer rows of one kind.
    pub fn peers_mut(&mut self, kind: PeerKind) -> &mut Vec<PeerRow> {
        match kind {
            PeerKind::Operating => &mut self.operating_peers,
            PeerKind::Trading => &mut self.trading_peers,
        }
    }
}
