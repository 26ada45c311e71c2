//! Timestamped records the charts are built from

use crate::{Metric, MetricValues};
use serde::{Deserialize, Serialize};

/// Origin of a record within a deployment's event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Anything written to stderr
    Error,
    Build,
    Output,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "stderr",
            Self::Build => "build",
            Self::Output => "output",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One parsed log event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub kind: EventKind,
    pub metrics: MetricValues,
}

impl Record {
    pub fn new(timestamp: i64, kind: EventKind, metrics: MetricValues) -> Self {
        Self {
            timestamp,
            kind,
            metrics,
        }
    }

    /// Output record carrying a single metric
    pub fn with_metric(timestamp: i64, metric: Metric, value: f64) -> Self {
        Self::new(
            timestamp,
            EventKind::Output,
            MetricValues::default().with(metric, value),
        )
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(metric)
    }
}
