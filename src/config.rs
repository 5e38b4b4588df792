use std::env;
use std::path::PathBuf;

use log::warn;

use crate::data_mapper::ConnectionMode;

pub const DEFAULT_GOALS_CSV: &str = "data/goals.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub goals_csv: PathBuf,
    pub connection_mode: ConnectionMode,
    pub palette_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            goals_csv: PathBuf::from(DEFAULT_GOALS_CSV),
            connection_mode: ConnectionMode::default(),
            palette_seed: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` then `.env`, then reads `GOALS_CSV`,
    /// `CONNECTION_MODE` and `PALETTE_SEED`.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(path) = lookup("GOALS_CSV").filter(|v| !v.trim().is_empty()) {
            cfg.goals_csv = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup("CONNECTION_MODE") {
            match raw.parse::<ConnectionMode>() {
                Ok(mode) => cfg.connection_mode = mode,
                Err(err) => warn!("ignoring CONNECTION_MODE: {err}"),
            }
        }
        cfg.palette_seed = lookup("PALETTE_SEED").and_then(|v| v.trim().parse::<u64>().ok());
        cfg
    }
}
