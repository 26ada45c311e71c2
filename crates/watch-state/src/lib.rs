//! # watch-state
//!
//! Display state for the deployment watcher.
//! Reads the user's chart choices from string-keyed client state and drives
//! the overview render.

pub mod overview;

pub use overview::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use watch_core::{Metric, SmoothingLevel, WatchError};

/// Client state keys
pub const METRIC_KEY: &str = "metric";
pub const METRICS_KEY: &str = "metrics";
pub const MODE_KEY: &str = "mode";
pub const SMOOTHING_KEY: &str = "smoothing";

// ============================================================================
// DISPLAY MODE
// ============================================================================

/// Whether buckets are shown per window or as a running total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Separate,
    Cumulative,
}

impl DisplayMode {
    pub fn is_cumulative(&self) -> bool {
        matches!(self, Self::Cumulative)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Separate => "separate",
            Self::Cumulative => "cumulative",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DisplayMode {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "separate" => Ok(Self::Separate),
            "cumulative" => Ok(Self::Cumulative),
            other => Err(WatchError::UnknownDisplayMode(other.to_string())),
        }
    }
}

// ============================================================================
// DISPLAY PARAMETERS
// ============================================================================

/// The user's chart choices for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayParams {
    /// Metrics to chart; more than one means comparison mode
    pub metrics: Vec<Metric>,
    pub mode: DisplayMode,
    pub smoothing: SmoothingLevel,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            metrics: vec![Metric::default()],
            mode: DisplayMode::default(),
            smoothing: SmoothingLevel::default(),
        }
    }
}

/// Parse `state[key]`, falling back to the default when it is absent or invalid
fn parse_or_default<T>(state: &HashMap<String, String>, key: &str) -> T
where
    T: FromStr<Err = WatchError> + Default,
{
    match state.get(key).map(|raw| raw.parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            tracing::warn!("Ignoring client state {}: {}", key, e);
            T::default()
        }
        None => T::default(),
    }
}

/// Valid, distinct metrics from a comma-separated list, in order
fn parse_metrics(raw: &str) -> Vec<Metric> {
    let mut metrics: Vec<Metric> = Vec::new();
    for name in raw.split(',').filter(|s| !s.trim().is_empty()) {
        match name.parse::<Metric>() {
            Ok(metric) if !metrics.contains(&metric) => metrics.push(metric),
            Ok(_) => {}
            Err(e) => tracing::warn!("Ignoring client state metric: {}", e),
        }
    }
    metrics
}

impl DisplayParams {
    /// Read parameters from client state; unknown values fall back to defaults.
    ///
    /// `metrics` (comma-separated) takes precedence over `metric` when it
    /// names at least one valid metric.
    pub fn from_client_state(state: &HashMap<String, String>) -> Self {
        let mut metrics = Vec::new();
        for key in [METRICS_KEY, METRIC_KEY] {
            if let Some(raw) = state.get(key) {
                metrics = parse_metrics(raw);
            }
            if !metrics.is_empty() {
                break;
            }
        }
        if metrics.is_empty() {
            metrics.push(Metric::default());
        }

        Self {
            metrics,
            mode: parse_or_default(state, MODE_KEY),
            smoothing: parse_or_default(state, SMOOTHING_KEY),
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.metrics.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let params = DisplayParams::from_client_state(&HashMap::new());
        assert_eq!(params, DisplayParams::default());
        assert!(!params.is_comparison());
    }

    #[test]
    fn test_single_metric() {
        let params = DisplayParams::from_client_state(&state(&[
            ("metric", "memorySize"),
            ("mode", "cumulative"),
            ("smoothing", "gentle"),
        ]));

        assert_eq!(params.metrics, vec![Metric::MemorySize]);
        assert_eq!(params.mode, DisplayMode::Cumulative);
        assert_eq!(params.smoothing, SmoothingLevel::Gentle);
    }

    #[test]
    fn test_comparison_metrics() {
        let params = DisplayParams::from_client_state(&state(&[
            ("metric", "memorySize"),
            ("metrics", "duration, billedDuration,duration,bogus"),
        ]));

        assert_eq!(params.metrics, vec![Metric::Duration, Metric::BilledDuration]);
        assert!(params.is_comparison());
    }

    #[test]
    fn test_empty_metrics_keeps_single_metric() {
        let params = DisplayParams::from_client_state(&state(&[
            ("metric", "memorySize"),
            ("metrics", ""),
        ]));
        assert_eq!(params.metrics, vec![Metric::MemorySize]);

        let params = DisplayParams::from_client_state(&state(&[
            ("metric", "maxMemoryUsed"),
            ("metrics", "bogus, ,latency"),
        ]));
        assert_eq!(params.metrics, vec![Metric::MaxMemoryUsed]);
        assert!(!params.is_comparison());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let params = DisplayParams::from_client_state(&state(&[
            ("metric", "latency"),
            ("mode", "stacked"),
            ("smoothing", "wobbly"),
        ]));
        assert_eq!(params, DisplayParams::default());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(" cumulative".parse::<DisplayMode>().unwrap(), DisplayMode::Cumulative);
        assert_eq!(DisplayMode::Separate.to_string(), "separate");
        assert!("stacked".parse::<DisplayMode>().is_err());
    }
}
