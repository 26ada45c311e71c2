//! Bucketing several metrics over one range with a common scale

use crate::{bucketize, Series, TimeRange, BUCKET_COUNT};
use watch_core::{Metric, Record};

/// Bucketed series for a set of metrics, plus the largest value across all
/// of them so the charts can share a y-scale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    /// One series per requested metric, in request order
    pub series: Vec<(Metric, Series)>,
    pub shared_max: f64,
}

impl Aggregation {
    pub fn get(&self, metric: Metric) -> Option<&Series> {
        self.series
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, series)| series)
    }

    /// Metrics ordered by descending peak value; ties keep request order
    pub fn ranked(&self) -> Vec<Metric> {
        let mut peaks: Vec<(Metric, f64)> = self
            .series
            .iter()
            .map(|(metric, series)| (*metric, series.max()))
            .collect();
        peaks.sort_by(|a, b| b.1.total_cmp(&a.1));
        peaks.into_iter().map(|(metric, _)| metric).collect()
    }

    /// Common y-domain `[0, shared_max]`
    pub fn y_domain(&self) -> (f64, f64) {
        (0.0, self.shared_max)
    }
}

/// Bucket every metric in `metrics` into [`BUCKET_COUNT`] windows of `range`
pub fn aggregate(records: &[Record], metrics: &[Metric], range: TimeRange, cumulative: bool) -> Aggregation {
    aggregate_buckets(records, metrics, range, BUCKET_COUNT, cumulative)
}

/// [`aggregate`] with an explicit bucket count.
///
/// Each series is bucketed fresh, then accumulated once when `cumulative`
/// is set. Repeated metrics are bucketed once.
pub fn aggregate_buckets(
    records: &[Record],
    metrics: &[Metric],
    range: TimeRange,
    count: usize,
    cumulative: bool,
) -> Aggregation {
    let mut series: Vec<(Metric, Series)> = Vec::with_capacity(metrics.len());

    for &metric in metrics {
        if series.iter().any(|(m, _)| *m == metric) {
            continue;
        }

        let bucketed = bucketize(records, metric, range, count);
        let values = if cumulative {
            bucketed.accumulate()
        } else {
            bucketed
        };
        series.push((metric, values));
    }

    let shared_max = series
        .iter()
        .map(|(_, s)| s.max())
        .reduce(f64::max)
        .unwrap_or(0.0);

    tracing::debug!(
        "Aggregated {} metrics (cumulative: {}), shared max {}",
        series.len(),
        cumulative,
        shared_max
    );

    Aggregation { series, shared_max }
}
