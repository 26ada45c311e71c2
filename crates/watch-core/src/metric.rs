//! Metrics reported in serverless invocation log lines

use crate::WatchError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// METRIC CATALOGUE
// ============================================================================

/// A numeric metric carried by a `REPORT` log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    #[default]
    Duration,
    BilledDuration,
    MemorySize,
    MaxMemoryUsed,
}

impl Metric {
    /// Label as it appears in the log text, before the colon
    pub fn label(&self) -> &'static str {
        match self {
            Self::Duration => "Duration",
            Self::BilledDuration => "Billed Duration",
            Self::MemorySize => "Memory Size",
            Self::MaxMemoryUsed => "Max Memory Used",
        }
    }

    /// Unit as it appears in the log text, after the number
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Duration | Self::BilledDuration => "ms",
            Self::MemorySize | Self::MaxMemoryUsed => "MB",
        }
    }

    /// Key used in client state and serialized forms
    pub fn key(&self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::BilledDuration => "billedDuration",
            Self::MemorySize => "memorySize",
            Self::MaxMemoryUsed => "maxMemoryUsed",
        }
    }

    /// Heading for the average summary box
    pub fn summary_title(&self) -> &'static str {
        match self {
            Self::Duration => "Average Duration",
            Self::BilledDuration => "Average Billed Duration",
            Self::MemorySize => "Average Memory size",
            Self::MaxMemoryUsed => "Average Memory Used",
        }
    }

    /// All metrics, in display order
    pub fn all() -> &'static [Self] {
        &[
            Self::Duration,
            Self::BilledDuration,
            Self::MemorySize,
            Self::MaxMemoryUsed,
        ]
    }

    /// Pull this metric's value out of free log text
    pub fn extract(&self, text: &str) -> Option<f64> {
        extract_metric(text, self.label(), self.unit())
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Metric {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|metric| metric.key() == s.trim())
            .ok_or_else(|| WatchError::UnknownMetric(s.to_string()))
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Find the first `"<label>: <number> <unit>"` in `text` and parse the number.
///
/// Returns `None` when no occurrence matches or the number does not parse.
pub fn extract_metric(text: &str, label: &str, unit: &str) -> Option<f64> {
    let prefix = format!("{}:", label);

    for (idx, _) in text.match_indices(&prefix) {
        let rest = &text[idx + prefix.len()..];
        let Some(rest) = strip_one_whitespace(rest) else {
            continue;
        };

        let digits_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if digits_len == 0 {
            continue;
        }

        let (number, tail) = rest.split_at(digits_len);
        let Some(tail) = strip_one_whitespace(tail) else {
            continue;
        };
        if !tail.starts_with(unit) {
            continue;
        }

        return number.parse::<f64>().ok();
    }

    None
}

fn strip_one_whitespace(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}

// ============================================================================
// PER-RECORD VALUES
// ============================================================================

/// One optional value per metric; `None` means the metric was not reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValues {
    pub duration: Option<f64>,
    pub billed_duration: Option<f64>,
    pub memory_size: Option<f64>,
    pub max_memory_used: Option<f64>,
}

impl MetricValues {
    /// Extract every metric from a log line
    pub fn from_log_text(text: &str) -> Self {
        Self {
            duration: Metric::Duration.extract(text),
            billed_duration: Metric::BilledDuration.extract(text),
            memory_size: Metric::MemorySize.extract(text),
            max_memory_used: Metric::MaxMemoryUsed.extract(text),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Duration => self.duration,
            Metric::BilledDuration => self.billed_duration,
            Metric::MemorySize => self.memory_size,
            Metric::MaxMemoryUsed => self.max_memory_used,
        }
    }

    /// Builder-style setter, mostly for fixtures
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        let slot = match metric {
            Metric::Duration => &mut self.duration,
            Metric::BilledDuration => &mut self.billed_duration,
            Metric::MemorySize => &mut self.memory_size,
            Metric::MaxMemoryUsed => &mut self.max_memory_used,
        };
        *slot = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "REPORT RequestId: 3f1c Duration: 12.34 ms Billed Duration: 100 ms Memory Size: 1024 MB Max Memory Used: 81 MB";

    #[test]
    fn test_extract_all_metrics() {
        let values = MetricValues::from_log_text(REPORT);
        assert_eq!(values.duration, Some(12.34));
        assert_eq!(values.billed_duration, Some(100.0));
        assert_eq!(values.memory_size, Some(1024.0));
        assert_eq!(values.max_memory_used, Some(81.0));
    }

    #[test]
    fn test_extract_missing_is_none() {
        let values = MetricValues::from_log_text("Build completed in 3s");
        assert_eq!(values, MetricValues::default());
    }

    #[test]
    fn test_extract_skips_non_matching_occurrence() {
        let text = "Duration: unknown. Duration: 7 ms";
        assert_eq!(extract_metric(text, "Duration", "ms"), Some(7.0));
    }

    #[test]
    fn test_extract_wrong_unit() {
        assert_eq!(extract_metric("Duration: 7 s", "Duration", "ms"), None);
    }

    #[test]
    fn test_extract_malformed_number() {
        assert_eq!(extract_metric("Duration: 1.2.3 ms", "Duration", "ms"), None);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("maxMemoryUsed".parse::<Metric>().unwrap(), Metric::MaxMemoryUsed);
        assert!("latency".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_values_get() {
        let values = MetricValues::default().with(Metric::MemorySize, 512.0);
        assert_eq!(values.get(Metric::MemorySize), Some(512.0));
        assert_eq!(values.get(Metric::Duration), None);
    }
}
