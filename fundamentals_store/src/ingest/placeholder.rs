//! Fixed stand-in data used by [`super::FallbackPolicy::Placeholder`].
//!
//! Values are synthetic and only exist so that downstream consumers have
//! something to read when the provider returns nothing.

use chrono::{Datelike, Days, NaiveDate};
use fundamentals_ingestor::models::{
    Payload,
    estimate::EstimateRow,
    peer::PeerRow,
    period::PeriodType,
    price_target::PriceTargetRow,
    statement::{StatementBatch, StatementRow},
};

const STATEMENT_COLUMNS: [&str; 5] = ["revenue", "netIncome", "grossProfit", "operatingIncome", "ebitda"];

fn payload(entries: &[(&str, f64)]) -> Payload {
    entries.iter().map(|(code, value)| (code.to_string(), Some(*value))).collect()
}

fn statements(period_type: PeriodType, rows: &[((i32, u32, u32), [f64; 5])]) -> StatementBatch {
    let rows = rows
        .iter()
        .filter_map(|&((y, m, d), values)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            let values = STATEMENT_COLUMNS
                .iter()
                .zip(values)
                .map(|(code, value)| (code.to_string(), Some(value)))
                .collect();
            Some(StatementRow { date, values })
        })
        .collect();
    StatementBatch { period_type, rows }
}

/// Two fiscal years ending 2022-12-31 and 2021-12-31.
pub fn annual_statements() -> StatementBatch {
    statements(
        PeriodType::Annual,
        &[
            ((2022, 12, 31), [100.0, 20.0, 40.0, 30.0, 35.0]),
            ((2021, 12, 31), [90.0, 18.0, 36.0, 27.0, 31.5]),
        ],
    )
}

/// Two quarters ending 2023-03-31 and 2022-12-31.
pub fn quarterly_statements() -> StatementBatch {
    statements(
        PeriodType::Quarter,
        &[
            ((2023, 3, 31), [25.0, 5.0, 10.0, 7.5, 8.75]),
            ((2022, 12, 31), [24.0, 4.8, 9.6, 7.2, 8.4]),
        ],
    )
}

/// Estimates for the current and next calendar year.
pub fn estimates(today: NaiveDate) -> Vec<EstimateRow> {
    let year = today.year();
    vec![
        EstimateRow::new(year, payload(&[("revenue", 110.0), ("netIncome", 22.0), ("ebitda", 35.0)])),
        EstimateRow::new(year + 1, payload(&[("revenue", 120.0), ("netIncome", 24.0), ("ebitda", 38.0)])),
    ]
}

/// Peer tickers used when none were given and none could be fetched.
pub fn peer_tickers() -> Vec<String> {
    vec!["PEER1".to_string(), "PEER2".to_string()]
}

/// Operating metrics for the placeholder peers.
pub fn operating_peers() -> Vec<PeerRow> {
    vec![
        PeerRow {
            peer_ticker: "PEER1".into(),
            values: payload(&[("revenue", 95.0), ("margin", 0.2)]),
        },
        PeerRow {
            peer_ticker: "PEER2".into(),
            values: payload(&[("revenue", 105.0), ("margin", 0.22)]),
        },
    ]
}

/// Trading multiples for the placeholder peers.
pub fn trading_peers() -> Vec<PeerRow> {
    vec![
        PeerRow {
            peer_ticker: "PEER1".into(),
            values: payload(&[("pe", 15.0), ("pb", 2.0)]),
        },
        PeerRow {
            peer_ticker: "PEER2".into(),
            values: payload(&[("pe", 16.0), ("pb", 2.2)]),
        },
    ]
}

/// Two broker targets published a week and two weeks before `today`.
pub fn price_targets(today: NaiveDate) -> Vec<PriceTargetRow> {
    vec![
        PriceTargetRow {
            broker: Some("Goldman".into()),
            analyst: Some("John Doe".into()),
            published_date: today.checked_sub_days(Days::new(7)),
            price_target: Some(150.0),
            direction: Some("up".into()),
        },
        PriceTargetRow {
            broker: Some("Morgan".into()),
            analyst: Some("Jane Smith".into()),
            published_date: today.checked_sub_days(Days::new(14)),
            price_target: Some(160.0),
            direction: Some("same".into()),
        },
    ]
}
