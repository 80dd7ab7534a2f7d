//! Reconciliation engine for company fundamentals.
//!
//! Takes the batches fetched by a [`fundamentals_ingestor`] provider and merges
//! them into a relational store, SQLite or PostgreSQL:
//! - dimensions (symbols, periods) are looked up or created, never duplicated;
//! - estimates and peer relations are write-once per key;
//! - metrics and price targets are append-only facts.
//!
//! Entry points: [`db::store::Store`] for the store handle,
//! [`ingest::ingest_dataset`] / [`ingest::run_ticker`] for a full run.

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod query;
pub mod resolve;
/// Diesel table definitions, shared by both backends.
#[allow(missing_docs)]
pub mod schema;
pub mod writers;
