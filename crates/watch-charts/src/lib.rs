//! # watch-charts
//!
//! SVG charting for deployment log metrics.
//! Turns timestamped records into a filled, optionally smoothed curve with
//! axes, serialized as an embeddable data URI.
//!
//! ## Modules
//!
//! - `bucket` - Fixed-width time windows and the cumulative transform
//! - `aggregate` - Multi-metric bucketing with a shared scale
//! - `chartkit` - Core primitives: points, path builder, smoothing
//! - `axis` - Gridlines and tick labels
//! - `compose` - SVG document assembly and data URI encoding

pub mod aggregate;
pub mod axis;
pub mod bucket;
pub mod chartkit;
pub mod compose;

pub use aggregate::*;
pub use axis::*;
pub use bucket::*;
pub use chartkit::*;
pub use compose::*;

// Re-export colors from watch-core for convenience
pub use watch_core::colors;

/// Buckets per chart
pub const BUCKET_COUNT: usize = 50;

/// Horizontal pixels between adjacent buckets
pub const BUCKET_SPACING: f64 = 10.0;

/// Chart viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport that fits `bucket_count` buckets with room for the axes
    pub fn for_buckets(bucket_count: usize, height: f64) -> Self {
        Self::new(
            (bucket_count as f64 * BUCKET_SPACING * 1.2).round(),
            (height * 1.1 * 1.2).round(),
        )
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    pub fn basis(&self) -> PlotBasis {
        PlotBasis::new(*self)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::for_buckets(BUCKET_COUNT, 100.0)
    }
}

/// Geometry shared by the data path and the axes.
///
/// Both sides must place pixels through this type so the curve and the
/// gridlines stay aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBasis {
    pub viewport: Viewport,
    /// Left edge of the plot area
    pub left: f64,
    /// Pixel row of the zero line
    pub baseline: f64,
    pub font_size: f64,
}

impl PlotBasis {
    pub fn new(viewport: Viewport) -> Self {
        let Viewport { width, height } = viewport;
        Self {
            viewport,
            left: (width / 6.0).round(),
            baseline: (height / 1.2).round(),
            font_size: (height / 12.0).floor().min((width / 22.0).floor()),
        }
    }

    pub fn width(&self) -> f64 {
        self.viewport.width
    }

    pub fn height(&self) -> f64 {
        self.viewport.height
    }

    /// X pixel of bucket `index`
    pub fn x_for_index(&self, index: usize) -> f64 {
        self.left + index as f64 * BUCKET_SPACING
    }

    /// Unrounded Y pixel of `value` on a `[0, y_max]` scale.
    ///
    /// A zero (or non-finite) `y_max` has no extent, so everything sits on
    /// the baseline.
    pub fn y_for_value(&self, value: f64, y_max: f64) -> f64 {
        if y_max == 0.0 || !y_max.is_finite() {
            return self.baseline;
        }

        let plot_height = self.height() / 1.2;
        plot_height * (1.0 + 10.0 * (y_max - value) / y_max) / 11.0
    }

    /// Data point for bucket `index`, rounded to whole pixels
    pub fn point_for(&self, index: usize, value: f64, y_max: f64) -> Point {
        Point::new(self.x_for_index(index), self.y_for_value(value, y_max)).rounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_margins() {
        let basis = Viewport::new(600.0, 132.0).basis();
        assert_eq!(basis.left, 100.0);
        assert_eq!(basis.baseline, 110.0);
        assert_eq!(basis.font_size, 11.0);
    }

    #[test]
    fn test_font_size_uses_narrower_side() {
        let basis = Viewport::new(220.0, 600.0).basis();
        assert_eq!(basis.font_size, 10.0);
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 600.0);
        assert_eq!(viewport.height, 132.0);
        assert_eq!(viewport.viewbox(), "0 0 600 132");
    }

    #[test]
    fn test_peak_value_pixel() {
        let basis = Viewport::new(600.0, 120.0).basis();
        // 100 * (1 + 0) / 11 = 9.09
        assert_eq!(basis.point_for(0, 42.0, 42.0), Point::new(100.0, 9.0));
    }

    #[test]
    fn test_zero_value_sits_on_baseline() {
        let basis = Viewport::new(600.0, 120.0).basis();
        assert_eq!(basis.point_for(3, 0.0, 42.0), Point::new(130.0, 100.0));
    }

    #[test]
    fn test_zero_scale_is_flat() {
        let basis = Viewport::new(600.0, 120.0).basis();
        assert_eq!(basis.y_for_value(0.0, 0.0), basis.baseline);
        assert_eq!(basis.y_for_value(5.0, 0.0), basis.baseline);
    }
}
