//! Overview rendering: metric summaries plus one chart per requested metric

use crate::DisplayParams;
use serde::{Deserialize, Serialize};
use watch_charts::{
    aggregate_buckets, colors, compose, ChartSpec, TimeRange, Viewport, BUCKET_COUNT,
};
use watch_core::{format_value, Metric, MetricSummary, Record};

/// Chart sizing and fill for the overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewConfig {
    pub bucket_count: usize,
    /// Plot height before margins are added
    pub chart_height: f64,
    pub color: String,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            bucket_count: BUCKET_COUNT,
            chart_height: 100.0,
            color: colors::ACCENT.to_string(),
        }
    }
}

impl OverviewConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::for_buckets(self.bucket_count, self.chart_height)
    }
}

/// One metric's chart as an embeddable image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedChart {
    pub metric: Metric,
    pub title: String,
    /// Largest bucket value of this metric's series
    pub peak: f64,
    /// `data:image/svg+xml,...` URI
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Overview {
    pub summaries: Vec<MetricSummary>,
    pub charts: Vec<RenderedChart>,
}

impl Overview {
    pub fn chart(&self, metric: Metric) -> Option<&RenderedChart> {
        self.charts.iter().find(|chart| chart.metric == metric)
    }
}

/// Summaries for every metric, plus a chart for each metric in `params`.
///
/// Charts are ordered by descending peak and share the y-domain
/// `[0, shared_max]`. With a single metric that is just its own peak.
pub fn render_overview(records: &[Record], params: &DisplayParams, config: &OverviewConfig) -> Overview {
    let range = TimeRange::spanning(records).unwrap_or_default();
    let aggregation = aggregate_buckets(
        records,
        &params.metrics,
        range,
        config.bucket_count,
        params.mode.is_cumulative(),
    );
    let viewport = config.viewport();

    tracing::debug!(
        "Rendering overview of {} records: {:?} ({}), shared max {}",
        records.len(),
        params.metrics,
        params.mode,
        aggregation.shared_max
    );

    let charts = aggregation
        .ranked()
        .into_iter()
        .filter_map(|metric| {
            let series = aggregation.get(metric)?;
            let unit = metric.unit();
            let spec = ChartSpec::new(range.as_domain(), aggregation.y_domain())
                .with_viewport(viewport)
                .with_y_formatter(move |v: f64| format!("{}{}", format_value(v), unit))
                .with_color(config.color.as_str())
                .with_smoothing(params.smoothing);

            Some(RenderedChart {
                metric,
                title: format!("{} ({})", metric.label(), params.mode),
                peak: series.max(),
                image: compose(series, &spec),
            })
        })
        .collect();

    Overview {
        summaries: MetricSummary::all(records),
        charts,
    }
}
