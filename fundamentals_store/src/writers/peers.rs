//! Write-once peer relations, one table per [`PeerKind`].
//!
//! Peer tickers are stored as text only; they are not resolved into
//! `symbols`.

use diesel::prelude::*;
use fundamentals_ingestor::models::{Payload, peer::PeerKind, peer::PeerRow};
use tracing::warn;

use crate::{
    db::store::Session,
    error::{StoreResult, ValidationError},
    resolve::normalize_ticker,
    schema::{peer_operating, peer_trading},
    writers::{Batch, MergeOutcome, MergeSummary, RowRejection},
};

macro_rules! merge_into {
    ($table:ident, $conn:expr, $host:expr, $peer:expr, $payload:expr) => {{
        let exists = diesel::select(diesel::dsl::exists(
            $table::table
                .filter($table::host_symbol_id.eq($host))
                .filter($table::peer_ticker.eq($peer)),
        ))
        .get_result::<bool>($conn)?;
        if exists {
            MergeOutcome::Skipped
        } else {
            diesel::insert_into($table::table)
                .values((
                    $table::host_symbol_id.eq($host),
                    $table::peer_ticker.eq($peer),
                    $table::payload.eq($payload),
                ))
                .execute($conn)?;
            MergeOutcome::Inserted
        }
    }};
}

/// Insert the `(host_symbol_id, peer_ticker)` relation of `kind` unless it exists.
///
/// The peer ticker is upper-cased first; an empty one is a validation error
/// (returned as [`crate::error::StoreError::Validation`]).
pub fn merge_peer(
    session: &mut Session<'_>,
    host_symbol_id: i32,
    peer_ticker: &str,
    kind: PeerKind,
    payload: &Payload,
) -> StoreResult<MergeOutcome> {
    let peer = normalize_ticker(peer_ticker).map_err(|_| ValidationError::EmptyPeerTicker)?;
    let payload = serde_json::to_string(payload)?;
    let conn = session.conn();

    let outcome = match kind {
        PeerKind::Operating => merge_into!(peer_operating, conn, host_symbol_id, &peer, &payload),
        PeerKind::Trading => merge_into!(peer_trading, conn, host_symbol_id, &peer, &payload),
    };
    Ok(outcome)
}

/// Merge a batch of peer rows of one kind; empty peer tickers are rejected.
pub fn merge_peers(
    session: &mut Session<'_>,
    host_symbol_id: i32,
    kind: PeerKind,
    rows: &[PeerRow],
) -> StoreResult<MergeSummary> {
    let batch = match kind {
        PeerKind::Operating => Batch::OperatingPeers,
        PeerKind::Trading => Batch::TradingPeers,
    };
    let mut summary = MergeSummary::default();
    for (index, row) in rows.iter().enumerate() {
        if row.peer_ticker.trim().is_empty() {
            warn!(host_symbol_id, %kind, index, "rejected peer row without ticker");
            summary.rejected.push(RowRejection {
                batch,
                index,
                reason: ValidationError::EmptyPeerTicker,
            });
            continue;
        }
        summary.record(merge_peer(session, host_symbol_id, &row.peer_ticker, kind, &row.values)?);
    }
    Ok(summary)
}
