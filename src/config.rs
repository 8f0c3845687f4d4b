//! Application-level configuration loading: match rules, broadcast cadence and CORS origins.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::MatchRules;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "VOTING_WAR_CONFIG_PATH";

const DEFAULT_WIN_SCORE: u32 = 100;
const DEFAULT_COUNTDOWN_SECONDS: u64 = 8;
const DEFAULT_BROADCAST_INTERVAL_MS: u64 = 500;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    win_score: u32,
    countdown_seconds: u64,
    broadcast_interval_ms: u64,
    store_timeout_ms: u64,
    cors_origins: Vec<String>,
}

impl AppConfig {
    /// Load the configuration file, then apply environment overrides.
    ///
    /// Any unreadable or invalid source is logged and replaced by built-in defaults.
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_overrides(|key| env::var(key).ok());
        info!(
            win_score = config.win_score,
            countdown_seconds = config.countdown_seconds,
            broadcast_interval_ms = config.broadcast_interval_ms,
            store_timeout_ms = config.store_timeout_ms,
            cors_origins = ?config.cors_origins,
            "configuration loaded"
        );
        config
    }

    fn load_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Apply `WIN_SCORE`, `COUNTDOWN_SECONDS` and `CORS_ORIGINS` from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("WIN_SCORE") {
            match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => self.win_score = value,
                _ => warn!(value = %raw, "ignoring invalid WIN_SCORE"),
            }
        }

        if let Some(raw) = lookup("COUNTDOWN_SECONDS") {
            match raw.trim().parse::<u64>() {
                Ok(value) => self.countdown_seconds = value,
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid COUNTDOWN_SECONDS"),
            }
        }

        if let Some(raw) = lookup("CORS_ORIGINS") {
            self.cors_origins = split_origins(&raw);
        }
    }

    /// Rules handed to the match manager.
    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            win_score: self.win_score,
            countdown: Duration::from_secs(self.countdown_seconds),
            store_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }

    /// Cadence of the periodic snapshot rebroadcast.
    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.broadcast_interval_ms)
    }

    /// Browser origins allowed by the CORS layer; empty means any origin.
    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            win_score: DEFAULT_WIN_SCORE,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            broadcast_interval_ms: DEFAULT_BROADCAST_INTERVAL_MS,
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    win_score: Option<u32>,
    countdown_seconds: Option<u64>,
    broadcast_interval_ms: Option<u64>,
    store_timeout_ms: Option<u64>,
    cors_origins: Option<Vec<String>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let win_score = match value.win_score {
            Some(0) => {
                warn!("win_score must be positive; using default");
                defaults.win_score
            }
            Some(score) => score,
            None => defaults.win_score,
        };

        Self {
            win_score,
            countdown_seconds: value.countdown_seconds.unwrap_or(defaults.countdown_seconds),
            broadcast_interval_ms: value
                .broadcast_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.broadcast_interval_ms),
            store_timeout_ms: value
                .store_timeout_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.store_timeout_ms),
            cors_origins: value.cors_origins.unwrap_or(defaults.cors_origins),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}
