//! Run configuration: TOML file, then environment, then CLI flags.
//!
//! ```toml
//! database_url = "sqlite://financial_data.sqlite"
//! fallback = "placeholder"          # or "disabled"
//! sqlite_id_recovery = "returning"  # or "latest_row"
//! peer_limit = 5
//! statement_limit = 5
//! ```
//!
//! Every key is optional. Unknown keys are an error.
//! Entrypoints: [`load_config_str`], [`load_config_path`], [`SyncConfig::apply_env`].

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use shared_utils::env::optional_env_var;
use toml::from_str;

use crate::{
    db::store::IdRecovery,
    ingest::{FallbackPolicy, FetchOptions},
};

/// Connection string used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://financial_data.sqlite";

/// Environment variable overriding [`SyncConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Settings of a `fundamentals-sync` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SyncConfig {
    /// `postgres://…` or a SQLite path / `sqlite://` URL.
    pub database_url: String,
    /// Behavior on failed or empty fetches.
    pub fallback: FallbackPolicy,
    /// Id recovery used on SQLite. PostgreSQL always uses `RETURNING`.
    pub sqlite_id_recovery: IdRecovery,
    /// Maximum peers whose metrics are fetched.
    pub peer_limit: usize,
    /// Statements requested per period type.
    pub statement_limit: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            fallback: FallbackPolicy::default(),
            sqlite_id_recovery: IdRecovery::default(),
            peer_limit: 5,
            statement_limit: 5,
        }
    }
}

impl SyncConfig {
    /// Override file values with the process environment (`DATABASE_URL`).
    pub fn apply_env(&mut self) {
        if let Some(url) = optional_env_var(DATABASE_URL_ENV) {
            self.database_url = url;
        }
    }

    /// Options for the fetch stage.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            fallback: self.fallback,
            statement_limit: self.statement_limit,
            peer_limit: self.peer_limit,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database_url.trim().is_empty() {
            bail!("database_url must not be empty");
        }
        if self.statement_limit == 0 {
            bail!("statement_limit must be at least 1");
        }
        Ok(())
    }
}

/// Parse and validate a configuration from TOML text.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<SyncConfig> {
    let cfg: SyncConfig = from_str(toml_str).context("failed to parse config TOML")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read a configuration file from disk. See [`load_config_str`].
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<SyncConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = load_config_str("").unwrap();
        assert_eq!(cfg, SyncConfig::default());
        assert_eq!(cfg.fetch_options(), FetchOptions::default());
    }

    #[test]
    fn parses_all_keys() {
        let cfg = load_config_str(
            r#"
            database_url = "postgres://u@localhost/fundamentals"
            fallback = "placeholder"
            sqlite_id_recovery = "returning"
            peer_limit = 3
            statement_limit = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.fallback, FallbackPolicy::Placeholder);
        assert_eq!(cfg.sqlite_id_recovery, IdRecovery::Returning);
        assert_eq!(cfg.fetch_options().peer_limit, 3);
        assert_eq!(cfg.fetch_options().statement_limit, 10);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(load_config_str("databse_url = \"x\"").is_err());
        assert!(load_config_str("fallback = \"sometimes\"").is_err());
        assert!(load_config_str("statement_limit = 0").is_err());
    }

    #[test]
    #[serial]
    fn env_overrides_database_url() {
        unsafe { std::env::set_var(DATABASE_URL_ENV, "sqlite::memory:") };
        let mut cfg = SyncConfig::default();
        cfg.apply_env();
        assert_eq!(cfg.database_url, "sqlite::memory:");

        unsafe { std::env::set_var(DATABASE_URL_ENV, "   ") };
        let mut cfg = SyncConfig::default();
        cfg.apply_env();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);

        unsafe { std::env::remove_var(DATABASE_URL_ENV) };
    }
}
