//! Peer-company metrics, keyed by peer ticker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Payload;

/// The two independent peer relationships a host ticker can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerKind {
    /// Operating comparables (revenue, margin, ...).
    Operating,
    /// Trading comparables (multiples).
    Trading,
}

impl PeerKind {
    /// Both kinds, operating first.
    pub const ALL: [PeerKind; 2] = [PeerKind::Operating, PeerKind::Trading];

    /// Short code used in logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            PeerKind::Operating => "operating",
            PeerKind::Trading => "trading",
        }
    }
}

impl fmt::Display for PeerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One peer's metrics for one relationship kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerRow {
    /// Peer ticker. Not required to exist as an ingested symbol.
    pub peer_ticker: String,
    /// Metrics, peer ticker excluded.
    pub values: Payload,
}

/// Everything fetched for a single peer, split by relationship kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeerSnapshot {
    /// Operating metrics.
    pub operating: Payload,
    /// Trading metrics.
    pub trading: Payload,
}
