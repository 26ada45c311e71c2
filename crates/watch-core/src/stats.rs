//! Per-metric averages shown above the chart

use crate::{Metric, Record};
use serde::{Deserialize, Serialize};

/// Rounded mean of `metric` over the records that report it.
///
/// Records without the metric are skipped; an empty selection averages to 0.
pub fn average(records: &[Record], metric: Metric) -> f64 {
    let (sum, count) = records
        .iter()
        .filter_map(|record| record.get(metric))
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    (sum / count.max(1) as f64).round()
}

/// Average of one metric, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub title: String,
    pub average: f64,
    pub unit: String,
}

impl MetricSummary {
    pub fn from_records(records: &[Record], metric: Metric) -> Self {
        Self {
            metric,
            title: metric.summary_title().to_string(),
            average: average(records, metric),
            unit: metric.unit().to_uppercase(),
        }
    }

    /// Summaries for every metric, in display order
    pub fn all(records: &[Record]) -> Vec<Self> {
        Metric::all()
            .iter()
            .map(|&metric| Self::from_records(records, metric))
            .collect()
    }

    /// Value with its unit, e.g. `"42MS"`
    pub fn display_value(&self) -> String {
        format!("{}{}", self.average, self.unit)
    }
}
