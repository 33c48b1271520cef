//! Service configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

pub const ADDR_VAR: &str = "ASLI_DAWA_ADDR";
pub const DB_PATH_VAR: &str = "ASLI_DAWA_DB_PATH";

const DEFAULT_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DB_PATH: &str = "asli_dawa.db";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub addr: SocketAddr,
    /// SQLite catalog file
    pub db_path: PathBuf,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = var_or(&lookup, ADDR_VAR, DEFAULT_ADDR);
        let addr = addr
            .parse()
            .with_context(|| format!("invalid {ADDR_VAR} value: {addr}"))?;

        Ok(Self {
            addr,
            db_path: var_or(&lookup, DB_PATH_VAR, DEFAULT_DB_PATH).into(),
        })
    }
}

fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
