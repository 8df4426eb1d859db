use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Fragments whose baselines differ by less than this share a line.
pub const DEFAULT_LINE_TOLERANCE: f64 = 0.1;
/// A gap this many times the median line gap starts a new paragraph.
pub const DEFAULT_PARAGRAPH_GAP_RATIO: f64 = 1.8;
/// Upload limit the caller enforces before handing bytes to `parse`.
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_PARSE_TIMEOUT_SECS: u64 = 30;

/// Knobs for the layout reconstruction step. Everything else in the
/// pipeline is fixed heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserConfig {
    pub line_tolerance: f64,
    /// `None` joins every line with a single newline.
    pub paragraph_gap_ratio: Option<f64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
            paragraph_gap_ratio: Some(DEFAULT_PARAGRAPH_GAP_RATIO),
        }
    }
}

/// Binary configuration loaded from environment variables.
/// Every value has a default; malformed values are an error.
#[derive(Debug, Clone)]
pub struct Config {
    pub max_file_bytes: usize,
    pub parse_timeout: Duration,
    pub parser: ParserConfig,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let line_tolerance = env_or("RESUME_LINE_TOLERANCE", DEFAULT_LINE_TOLERANCE)?;
        let gap_ratio = env_or("RESUME_PARAGRAPH_GAP_RATIO", DEFAULT_PARAGRAPH_GAP_RATIO)?;

        Ok(Config {
            max_file_bytes: env_or("RESUME_MAX_FILE_BYTES", DEFAULT_MAX_FILE_BYTES)?,
            parse_timeout: Duration::from_secs(env_or(
                "RESUME_PARSE_TIMEOUT_SECS",
                DEFAULT_PARSE_TIMEOUT_SECS,
            )?),
            parser: ParserConfig {
                line_tolerance,
                paragraph_gap_ratio: (gap_ratio > 0.0).then_some(gap_ratio),
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
