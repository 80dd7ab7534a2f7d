use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fundamentals_ingestor::{
    models::{dataset::Dataset, peer::PeerKind},
    providers::fmp_rest::FmpProvider,
};
use fundamentals_store::{
    config::{SyncConfig, load_config_path},
    db::store::{IdRecovery, Store},
    ingest::{FallbackPolicy, IngestReport, ingest_dataset_for, run_ticker},
    query::{Table, count_rows, find_symbol, metrics_for, peers_for},
    resolve::parse_period_type,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(version, about = "Fetch company fundamentals and reconcile them into a SQL store")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Overrides the configured / DATABASE_URL connection string.
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,
    /// Use INSERT … RETURNING on SQLite instead of reading back the latest row.
    #[arg(long, global = true)]
    sqlite_returning: bool,
    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create or upgrade the schema.
    Init,
    /// Fetch and ingest one ticker.
    Etl {
        ticker: String,
        /// Peer tickers; fetched from the provider when omitted.
        #[arg(conflicts_with = "from_file")]
        peers: Vec<String>,
        /// Replace failed or empty batches with placeholder data.
        #[arg(long, conflicts_with = "from_file")]
        fallback: bool,
        /// Ingest a dataset JSON file for TICKER instead of calling the provider.
        #[arg(long, value_name = "FILE")]
        from_file: Option<PathBuf>,
    },
    /// Print what is stored for a ticker.
    Show {
        ticker: String,
        #[arg(long, default_value = "annual")]
        period: String,
        /// Restrict to these metric codes.
        #[arg(long = "metric", value_name = "CODE")]
        metrics: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<SyncConfig> {
    let mut cfg = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => SyncConfig::default(),
    };
    cfg.apply_env();
    if let Some(url) = &cli.database_url {
        cfg.database_url = url.clone();
    }
    if cli.sqlite_returning {
        cfg.sqlite_id_recovery = IdRecovery::Returning;
    }
    Ok(cfg)
}

fn open_store(cfg: &SyncConfig) -> Result<Store> {
    let mut store = Store::open(&cfg.database_url, cfg.sqlite_id_recovery)
        .with_context(|| format!("open database {}", cfg.database_url))?;
    let applied = store.migrate()?;
    if !applied.is_empty() {
        info!(?applied, "applied migrations");
    }
    Ok(store)
}

fn print_report(report: &IngestReport) {
    println!("{} (symbol id {})", report.ticker, report.symbol_id);
    println!("  statement rows   {}", report.statement_rows);
    println!("  metrics written  {}", report.metrics_written);
    for (label, summary) in [
        ("estimates", &report.estimates),
        ("operating peers", &report.operating_peers),
        ("trading peers", &report.trading_peers),
    ] {
        println!("  {label:<16} {} inserted, {} already present", summary.inserted, summary.skipped);
    }
    println!(
        "  price targets    {} inserted, {} aggregates dropped",
        report.price_targets.inserted, report.price_targets.summaries_filtered
    );
    for rejection in report.rejected() {
        println!("  rejected {}[{}]: {}", rejection.batch, rejection.index, rejection.reason);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut cfg = resolve_config(&cli)?;

    match cli.cmd {
        Cmd::Init => {
            let mut store = open_store(&cfg)?;
            for table in Table::ALL {
                println!("{table:<20} {}", count_rows(store.connection(), table)?);
            }
            println!("database ready at {}", cfg.database_url);
        }
        Cmd::Etl {
            ticker,
            peers,
            fallback,
            from_file,
        } => {
            if fallback {
                cfg.fallback = FallbackPolicy::Placeholder;
            }
            let mut store = open_store(&cfg)?;
            let report = match from_file {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("read dataset file {}", path.display()))?;
                    let dataset: Dataset = serde_json::from_str(&text).context("failed to parse dataset JSON")?;
                    ingest_dataset_for(&mut store, &ticker, &dataset)?
                }
                None => {
                    let provider = FmpProvider::new()?;
                    run_ticker(&provider, &mut store, &ticker, &peers, &cfg.fetch_options()).await?
                }
            };
            print_report(&report);
        }
        Cmd::Show { ticker, period, metrics } => {
            let period_type = parse_period_type(&period)?;
            let mut store = open_store(&cfg)?;
            let conn = store.connection();

            let Some(symbol) = find_symbol(conn, &ticker)? else {
                anyhow::bail!("ticker {} not found, run `etl` first", ticker.trim().to_uppercase());
            };
            println!("{} {}", symbol.ticker, symbol.name.as_deref().unwrap_or(""));

            let codes: Vec<&str> = metrics.iter().map(String::as_str).collect();
            for obs in metrics_for(conn, &symbol.ticker, period_type, &codes)? {
                let value = obs.value.map_or_else(|| "null".to_string(), |v| v.to_string());
                println!("  {} {:<16} {value}", obs.period_end, obs.metric_code);
            }
            for kind in PeerKind::ALL {
                for peer in peers_for(conn, &symbol.ticker, kind)? {
                    println!("  {kind} peer {} {}", peer.peer_ticker, serde_json::to_string(&peer.payload)?);
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}
