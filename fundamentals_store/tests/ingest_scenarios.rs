mod common;
use common::{BOTH_RECOVERIES, count, date, fk_check_empty, payload, setup_store, single_annual};

use fundamentals_ingestor::models::{
    dataset::Dataset,
    estimate::EstimateRow,
    peer::{PeerKind, PeerRow},
    period::PeriodType,
    price_target::PriceTargetRow,
};
use fundamentals_store::{
    ingest::ingest_dataset,
    query::{Table, find_symbol, metrics_for, peers_for},
};

#[test]
fn first_ingest_creates_one_symbol_period_and_metric() {
    for recovery in BOTH_RECOVERIES {
        let (_db, mut store) = setup_store(recovery);

        let report = ingest_dataset(&mut store, &single_annual("ABC")).unwrap();
        assert_eq!(report.ticker, "ABC");
        assert_eq!(report.metrics_written, 1);

        assert_eq!(count(&mut store, Table::Symbols), 1);
        assert_eq!(count(&mut store, Table::Periods), 1);
        assert_eq!(count(&mut store, Table::Metrics), 1);

        let symbol = find_symbol(store.connection(), "ABC").unwrap().unwrap();
        assert_eq!(symbol.id, report.symbol_id);

        let obs = metrics_for(store.connection(), "ABC", PeriodType::Annual, &["revenue"]).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].period_end, date(2022, 12, 31));
        assert_eq!(obs[0].value, Some(100.0));
        fk_check_empty(&mut store);
    }
}

#[test]
fn second_identical_ingest_appends_metrics_only() {
    for recovery in BOTH_RECOVERIES {
        let (_db, mut store) = setup_store(recovery);

        let first = ingest_dataset(&mut store, &single_annual("ABC")).unwrap();
        let second = ingest_dataset(&mut store, &single_annual("abc")).unwrap();
        assert_eq!(first.symbol_id, second.symbol_id, "{recovery:?}");

        assert_eq!(count(&mut store, Table::Symbols), 1);
        assert_eq!(count(&mut store, Table::Periods), 1);
        assert_eq!(count(&mut store, Table::Metrics), 2);

        let obs = metrics_for(store.connection(), "ABC", PeriodType::Annual, &["revenue"]).unwrap();
        assert_eq!(obs.len(), 2);
        assert!(obs.iter().all(|o| o.value == Some(100.0)));
    }
}

#[test]
fn summary_price_target_is_not_stored() {
    for recovery in BOTH_RECOVERIES {
        let (_db, mut store) = setup_store(recovery);

        let mut ds = Dataset::empty("ABC");
        ds.price_targets = vec![
            PriceTargetRow {
                analyst: Some("Jane".into()),
                price_target: Some(150.0),
                direction: Some("up".into()),
                ..Default::default()
            },
            PriceTargetRow {
                analyst: Some("SUMMARY".into()),
                price_target: Some(152.0),
                direction: Some("up".into()),
                ..Default::default()
            },
        ];
        let report = ingest_dataset(&mut store, &ds).unwrap();
        assert_eq!(report.price_targets.inserted, 1);
        assert_eq!(report.price_targets.summaries_filtered, 1);
        assert_eq!(count(&mut store, Table::PriceTargets), 1);
    }
}

#[test]
fn full_dataset_rerun_keeps_write_once_rows() {
    let (_db, mut store) = setup_store(Default::default());

    let mut ds = single_annual("ABC");
    ds.name = Some("ABC Holdings".into());
    ds.quarterly.rows.push(fundamentals_ingestor::models::statement::StatementRow {
        date: date(2023, 3, 31),
        values: payload(&[("revenue", Some(25.0)), ("netIncome", Some(5.0))]),
    });
    ds.estimates = vec![
        EstimateRow::new(2025, payload(&[("revenue", Some(110.0))])),
        EstimateRow::new(2026, payload(&[("revenue", Some(120.0))])),
    ];
    ds.operating_peers = vec![PeerRow {
        peer_ticker: "PEER1".into(),
        values: payload(&[("revenue", Some(95.0)), ("margin", Some(0.2))]),
    }];
    ds.trading_peers = vec![PeerRow {
        peer_ticker: "PEER1".into(),
        values: payload(&[("pe", Some(15.0)), ("pb", Some(2.0))]),
    }];

    let first = ingest_dataset(&mut store, &ds).unwrap();
    assert_eq!(first.statement_rows, 2);
    assert_eq!(first.metrics_written, 3);
    assert_eq!(first.estimates.inserted, 2);
    assert_eq!(first.rejected().count(), 0);

    ds.estimates[0].values = payload(&[("revenue", Some(1.0))]);
    let second = ingest_dataset(&mut store, &ds).unwrap();
    assert_eq!(second.estimates.skipped, 2);
    assert_eq!(second.operating_peers.skipped, 1);
    assert_eq!(second.trading_peers.skipped, 1);

    assert_eq!(count(&mut store, Table::Periods), 2);
    assert_eq!(count(&mut store, Table::Metrics), 6);
    assert_eq!(count(&mut store, Table::Estimates), 2);
    assert_eq!(count(&mut store, Table::PeerOperating), 1);
    assert_eq!(count(&mut store, Table::PeerTrading), 1);
    // peers never become symbols
    assert_eq!(count(&mut store, Table::Symbols), 1);

    let quarterly = metrics_for(store.connection(), "ABC", PeriodType::Quarter, &[]).unwrap();
    assert_eq!(quarterly.len(), 4);
    let trading = peers_for(store.connection(), "ABC", PeerKind::Trading).unwrap();
    assert_eq!(trading[0].payload["pb"], Some(2.0));

    let symbol = find_symbol(store.connection(), "ABC").unwrap().unwrap();
    assert_eq!(symbol.name.as_deref(), Some("ABC Holdings"));
    fk_check_empty(&mut store);
}
