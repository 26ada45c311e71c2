//! Fixed-width time bucketing
//!
//! Irregular events are summed into equal windows over a half-open
//! `[start, end)` range.

use watch_core::{Metric, Record};

/// Smallest window width; keeps a collapsed range from dividing by zero
pub const MIN_STEP: f64 = 1e-24;

/// Half-open time interval `[start, end)` in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Range covering every record: earliest timestamp to one past the latest
    pub fn spanning(records: &[Record]) -> Option<Self> {
        let min = records.iter().map(|r| r.timestamp).min()?;
        let max = records.iter().map(|r| r.timestamp).max()?;
        Some(Self::new(min, max.saturating_add(1)))
    }

    pub fn span(&self) -> f64 {
        self.end as f64 - self.start as f64
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Window width for `count` buckets, never below [`MIN_STEP`]
    pub fn step(&self, count: usize) -> f64 {
        (self.span() / count as f64).max(MIN_STEP)
    }

    /// `[lower, upper)` of bucket `index`
    pub fn bucket_bounds(&self, index: usize, step: f64) -> (f64, f64) {
        let start = self.start as f64;
        (start + index as f64 * step, start + (index + 1) as f64 * step)
    }

    /// Bucket holding `timestamp`, if any.
    ///
    /// The result always satisfies `lower <= timestamp < upper` for the
    /// returned bucket's bounds.
    pub fn bucket_of(&self, timestamp: i64, step: f64, count: usize) -> Option<usize> {
        if !self.contains(timestamp) || count == 0 {
            return None;
        }

        let t = timestamp as f64;
        let guess = ((t - self.start as f64) / step).floor();
        let mut index = (guess.max(0.0) as usize).min(count - 1);

        // Float division can land one bucket off near a boundary
        while index > 0 && t < self.bucket_bounds(index, step).0 {
            index -= 1;
        }
        while index < count && t >= self.bucket_bounds(index, step).1 {
            index += 1;
        }

        (index < count && t >= self.bucket_bounds(index, step).0).then_some(index)
    }

    /// Axis domain as floats
    pub fn as_domain(&self) -> (f64, f64) {
        (self.start as f64, self.end as f64)
    }
}

// ============================================================================
// SERIES
// ============================================================================

/// Bucket values in time order, index 0 = earliest window
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series(pub Vec<f64>);

impl Series {
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest bucket value; 0 for an empty series
    pub fn max(&self) -> f64 {
        self.0.iter().copied().reduce(f64::max).unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Running-sum form: `out[i] = sum(self[..=i])`.
    ///
    /// Applying this to an already accumulated series accumulates twice, so
    /// always start from the bucketed series.
    pub fn accumulate(&self) -> Self {
        let mut total = 0.0;
        Self(
            self.0
                .iter()
                .map(|v| {
                    total += v;
                    total
                })
                .collect(),
        )
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Sum `metric` over the records in each of `count` equal windows of `range`.
///
/// Records outside the range, or without the metric, contribute nothing.
pub fn bucketize(records: &[Record], metric: Metric, range: TimeRange, count: usize) -> Series {
    let step = range.step(count);
    let mut series = Series::zeros(count);

    for record in records {
        let Some(value) = record.get(metric) else {
            continue;
        };
        if let Some(index) = range.bucket_of(record.timestamp, step, count) {
            series.0[index] += value;
        }
    }

    tracing::debug!(
        "Bucketized {} records into {} buckets of {}ms for {}",
        records.len(),
        count,
        step,
        metric
    );

    series
}

/// Running sum of `series`
pub fn accumulate(series: &Series) -> Series {
    series.accumulate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use watch_core::{EventKind, MetricValues};

    fn duration(t: i64, value: f64) -> Record {
        Record::with_metric(t, Metric::Duration, value)
    }

    #[test]
    fn test_two_buckets() {
        let records = vec![duration(0, 10.0), duration(500, 20.0)];
        let series = bucketize(&records, Metric::Duration, TimeRange::new(0, 1000), 2);
        assert_eq!(series.values(), &[10.0, 20.0]);
    }

    #[test]
    fn test_length_is_bucket_count() {
        let records = vec![duration(5, 1.0)];
        for count in [1, 2, 7, 50] {
            let series = bucketize(&records, Metric::Duration, TimeRange::new(0, 100), count);
            assert_eq!(series.len(), count);
        }
    }

    #[test]
    fn test_empty_records_all_zero() {
        let series = bucketize(&[], Metric::Duration, TimeRange::new(0, 100), 50);
        assert_eq!(series, Series::zeros(50));
    }

    #[test]
    fn test_out_of_range_excluded() {
        let records = vec![duration(-1, 5.0), duration(100, 7.0), duration(99, 1.0)];
        let series = bucketize(&records, Metric::Duration, TimeRange::new(0, 100), 4);
        assert_eq!(series.values(), &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_metric_contributes_nothing() {
        let records = vec![
            duration(10, 3.0),
            Record::new(10, EventKind::Build, MetricValues::default()),
            Record::with_metric(10, Metric::MemorySize, 1024.0),
        ];
        let series = bucketize(&records, Metric::Duration, TimeRange::new(0, 100), 1);
        assert_eq!(series.values(), &[3.0]);
    }

    #[test]
    fn test_negative_values_propagate() {
        let records = vec![duration(0, -4.0), duration(1, 1.0)];
        let series = bucketize(&records, Metric::Duration, TimeRange::new(0, 10), 1);
        assert_eq!(series.values(), &[-3.0]);
    }

    #[test]
    fn test_collapsed_range() {
        let range = TimeRange::new(42, 42);
        assert_eq!(range.step(50), MIN_STEP);

        let series = bucketize(&[duration(42, 9.0)], Metric::Duration, range, 50);
        assert_eq!(series, Series::zeros(50));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let records = vec![duration(i64::MAX, 1.0), duration(i64::MAX - 10, 2.0)];
        assert_eq!(
            TimeRange::spanning(&records),
            Some(TimeRange::new(i64::MAX - 10, i64::MAX))
        );

        let full = TimeRange::new(i64::MIN, i64::MAX);
        assert!(full.span().is_finite());
        assert!(full.span() > 0.0);
        assert!(full.step(50) > MIN_STEP);
    }

    #[test]
    fn test_boundaries_are_half_open() {
        let range = TimeRange::new(0, 90);
        let step = range.step(3);
        assert_eq!(range.bucket_of(0, step, 3), Some(0));
        assert_eq!(range.bucket_of(29, step, 3), Some(0));
        assert_eq!(range.bucket_of(30, step, 3), Some(1));
        assert_eq!(range.bucket_of(60, step, 3), Some(2));
        assert_eq!(range.bucket_of(89, step, 3), Some(2));
        assert_eq!(range.bucket_of(90, step, 3), None);
    }

    #[test]
    fn test_random_partition() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let start = rng.gen_range(-10_000..10_000);
            let end = start + rng.gen_range(1..100_000);
            let range = TimeRange::new(start, end);
            let count = rng.gen_range(1..80);

            let records: Vec<Record> = (0..rng.gen_range(0..300))
                .map(|_| {
                    let t = rng.gen_range(start - 500..end + 500);
                    duration(t, rng.gen_range(0..1000) as f64)
                })
                .collect();

            let series = bucketize(&records, Metric::Duration, range, count);
            assert_eq!(series.len(), count);

            let step = range.step(count);
            for (i, &bucket) in series.values().iter().enumerate() {
                let (lower, upper) = range.bucket_bounds(i, step);
                let expected: f64 = records
                    .iter()
                    .filter(|r| range.contains(r.timestamp))
                    .filter(|r| (r.timestamp as f64) >= lower && (r.timestamp as f64) < upper)
                    .filter_map(|r| r.get(Metric::Duration))
                    .sum();
                assert_eq!(bucket, expected, "bucket {i} of {count} over {range:?}");
            }

            let in_range: f64 = records
                .iter()
                .filter(|r| range.contains(r.timestamp))
                .filter_map(|r| r.get(Metric::Duration))
                .sum();
            assert_eq!(series.sum(), in_range);
        }
    }

    #[test]
    fn test_accumulate() {
        let series = Series::from(vec![1.0, 0.0, 2.5, 3.0]);
        let cumulative = accumulate(&series);

        assert_eq!(cumulative.values(), &[1.0, 1.0, 3.5, 6.5]);
        assert_eq!(cumulative.values()[3], series.sum());
        assert!(cumulative.values().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_accumulate_is_not_idempotent() {
        let series = Series::from(vec![1.0, 1.0, 1.0]);
        assert_eq!(series.accumulate().accumulate().values(), &[1.0, 3.0, 6.0]);
    }

    #[test]
    fn test_spanning() {
        let records = vec![duration(300, 1.0), duration(100, 1.0), duration(200, 1.0)];
        assert_eq!(TimeRange::spanning(&records), Some(TimeRange::new(100, 301)));
        assert_eq!(TimeRange::spanning(&[]), None);
    }

    #[test]
    fn test_series_max() {
        assert_eq!(Series::from(vec![-3.0, -1.0]).max(), -1.0);
        assert_eq!(Series::default().max(), 0.0);
    }
}
