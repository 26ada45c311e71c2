//! SVG document assembly
//!
//! Maps a bucketed series onto the plot basis, smooths it into a filled
//! area, appends the axes and encodes the whole document as a data URI.

use crate::{
    colors, escape_xml, render_axes, smooth, Point, Series, Viewport, BUCKET_SPACING,
};
use watch_core::{
    CompactValueFormatter, DateFormatter, DateGranularity, SmoothingLevel, ValueFormatter,
};

const DATA_URI_PREFIX: &str = "data:image/svg+xml,";

/// Everything needed to render one chart
pub struct ChartSpec {
    pub viewport: Viewport,
    /// Time domain in milliseconds
    pub x_range: (f64, f64),
    pub x_formatter: Box<dyn ValueFormatter>,
    /// Value domain; the upper bound is the top of the curve
    pub y_range: (f64, f64),
    pub y_formatter: Box<dyn ValueFormatter>,
    pub color: String,
    pub smoothing: SmoothingLevel,
}

impl ChartSpec {
    /// Chart with date labels on x, compact magnitudes on y, default viewport
    /// and accent fill
    pub fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let granularity = DateGranularity::for_span(x_range.1 - x_range.0);
        Self {
            viewport: Viewport::default(),
            x_range,
            x_formatter: Box::new(DateFormatter::new(granularity)),
            y_range,
            y_formatter: Box::new(CompactValueFormatter),
            color: colors::ACCENT.to_string(),
            smoothing: SmoothingLevel::default(),
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_x_formatter(mut self, formatter: impl ValueFormatter + 'static) -> Self {
        self.x_formatter = Box::new(formatter);
        self
    }

    pub fn with_y_formatter(mut self, formatter: impl ValueFormatter + 'static) -> Self {
        self.y_formatter = Box::new(formatter);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingLevel) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl std::fmt::Debug for ChartSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSpec")
            .field("viewport", &self.viewport)
            .field("x_range", &self.x_range)
            .field("y_range", &self.y_range)
            .field("color", &self.color)
            .field("smoothing", &self.smoothing)
            .finish_non_exhaustive()
    }
}

/// Pixel points for the filled area: baseline start, one point per bucket,
/// baseline end under the last bucket.
pub fn chart_points(series: &Series, viewport: Viewport, y_max: f64) -> Vec<Point> {
    let basis = viewport.basis();
    let last_x = basis.left + series.len().saturating_sub(1) as f64 * BUCKET_SPACING;

    let mut points = Vec::with_capacity(series.len() + 2);
    points.push(Point::new(basis.left, basis.baseline));
    points.extend(
        series
            .values()
            .iter()
            .enumerate()
            .map(|(i, &value)| basis.point_for(i, value, y_max)),
    );
    points.push(Point::new(last_x, basis.baseline));
    points
}

/// Complete SVG document for `series`
pub fn compose_document(series: &Series, spec: &ChartSpec) -> String {
    let points = chart_points(series, spec.viewport, spec.y_range.1);
    let path = smooth(&points, spec.smoothing);
    let axes = render_axes(
        spec.viewport,
        spec.x_range,
        spec.x_formatter.as_ref(),
        spec.y_range,
        spec.y_formatter.as_ref(),
    );

    tracing::trace!(
        "Composed chart of {} points in {} ({} smoothing)",
        points.len(),
        spec.viewport.viewbox(),
        spec.smoothing
    );

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" viewBox="{}">"#,
            r#"<path d="{}" fill="{}"/>"#,
            "{}",
            "</svg>"
        ),
        spec.viewport.viewbox(),
        path,
        escape_xml(&spec.color),
        axes
    )
}

/// Percent-encode a document into a `data:` URI safe inside a quoted attribute
pub fn encode_data_uri(document: &str) -> String {
    let encoded = urlencoding::encode(document)
        .replace('\'', "%27")
        .replace('"', "%22");
    format!("{}{}", DATA_URI_PREFIX, encoded)
}

/// Render `series` as an embeddable SVG data URI
pub fn compose(series: &Series, spec: &ChartSpec) -> String {
    encode_data_uri(&compose_document(series, spec))
}
