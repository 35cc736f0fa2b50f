use std::env;
use std::str::FromStr;

use crate::history::DEFAULT_TREND_WINDOW;
use crate::squad_ranker::DEFAULT_SUBSET_SIZE;
use crate::transfer_recommender::{DEFAULT_CANDIDATE_COUNT, DEFAULT_OWNERSHIP_CEILING};

pub const DEFAULT_API_BASE: &str = "https://fantasy.premierleague.com/api";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Runtime knobs for an analysis, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub api_base: String,
    pub subset_size: usize,
    pub candidate_count: usize,
    pub ownership_ceiling: f64,
    pub trend_window: usize,
    pub http_timeout_secs: u64,
    pub http_cache: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            subset_size: DEFAULT_SUBSET_SIZE,
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            ownership_ceiling: DEFAULT_OWNERSHIP_CEILING,
            trend_window: DEFAULT_TREND_WINDOW,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            http_cache: true,
        }
    }
}

impl AnalyzerConfig {
    /// Loads `.env.local` and `.env` (if present), then reads `FPL_*` variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let api_base = lookup("FPL_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(d.api_base);

        Self {
            api_base,
            subset_size: parsed(&lookup, "FPL_SUBSET_SIZE")
                .unwrap_or(d.subset_size)
                .clamp(1, 15),
            candidate_count: parsed(&lookup, "FPL_CANDIDATE_COUNT")
                .unwrap_or(d.candidate_count)
                .clamp(1, 50),
            ownership_ceiling: parsed(&lookup, "FPL_OWNERSHIP_CEILING")
                .filter(|v: &f64| v.is_finite())
                .unwrap_or(d.ownership_ceiling)
                .clamp(0.0, 100.0),
            trend_window: parsed(&lookup, "FPL_TREND_WINDOW")
                .unwrap_or(d.trend_window)
                .clamp(1, 38),
            http_timeout_secs: parsed(&lookup, "FPL_HTTP_TIMEOUT_SECS")
                .unwrap_or(d.http_timeout_secs)
                .max(1),
            http_cache: lookup("FPL_HTTP_CACHE")
                .map(|v| !is_off(&v))
                .unwrap_or(d.http_cache),
        }
    }
}

fn is_off(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|val| val.trim().parse::<T>().ok())
}
