//! # watch-core
//!
//! Core domain types for the deployment watcher.
//! Implements Strategy pattern for axis value formatting.

pub mod error;
pub mod event;
pub mod metric;
pub mod record;
pub mod stats;

pub use error::*;
pub use event::*;
pub use metric::*;
pub use record::*;
pub use stats::*;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// STRATEGY PATTERN: Value Formatters
// ============================================================================

/// Strategy trait for turning an axis value into a tick label
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

impl<F> ValueFormatter for F
where
    F: Fn(f64) -> String + Send + Sync,
{
    fn format(&self, value: f64) -> String {
        self(value)
    }
}

/// Magnitude suffixes, one per power of one thousand
const SUFFIXES: [&str; 6] = ["", "K", "M", "B", "T", "P"];

/// Compact a magnitude to at most three significant digits with a K/M/B/T/P suffix.
///
/// `0` formats as `"0"`; values below one thousand carry no suffix.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let mut exponent = abs.log10().floor() as i32;
    let mut mantissa = shift_decimal(abs, 2 - exponent).round();
    // 999.6 rounds up to a fourth digit
    if mantissa >= 1000.0 {
        exponent += 1;
        mantissa = (mantissa / 10.0).round();
    }

    let index = exponent.div_euclid(3).clamp(0, SUFFIXES.len() as i32 - 1);
    let scaled = shift_decimal(mantissa, exponent - 2 - index * 3);

    format!("{}{}{}", sign, scaled, SUFFIXES[index as usize])
}

/// `value * 10^places`, dividing for negative places so decimals stay exact
fn shift_decimal(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places.abs());
    if places >= 0 {
        value * factor
    } else {
        value / factor
    }
}

/// Compact magnitude formatter (`1500` -> `"1.5K"`)
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactValueFormatter;

impl ValueFormatter for CompactValueFormatter {
    fn format(&self, value: f64) -> String {
        format_value(value)
    }
}

/// How much of a timestamp a date label shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateGranularity {
    #[default]
    Day,
    Hour,
}

impl DateGranularity {
    const HOUR_SPAN_LIMIT_MS: f64 = 2.0 * 24.0 * 3600.0 * 1000.0;

    /// Hour labels for spans under two days, day labels otherwise
    pub fn for_span(span_ms: f64) -> Self {
        if span_ms < Self::HOUR_SPAN_LIMIT_MS {
            Self::Hour
        } else {
            Self::Day
        }
    }
}

/// Short UTC date label: `day/month`, plus the hour at [`DateGranularity::Hour`]
pub fn format_date(timestamp_ms: i64, granularity: DateGranularity) -> String {
    let Some(dt) = Utc.timestamp_millis_opt(timestamp_ms).single() else {
        return timestamp_ms.to_string();
    };

    match granularity {
        DateGranularity::Day => dt.format("%-d/%-m").to_string(),
        DateGranularity::Hour => dt.format("%-d/%-m %Hh").to_string(),
    }
}

/// Date formatter for time axes
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatter {
    pub granularity: DateGranularity,
}

impl DateFormatter {
    pub fn new(granularity: DateGranularity) -> Self {
        Self { granularity }
    }
}

impl ValueFormatter for DateFormatter {
    fn format(&self, value: f64) -> String {
        format_date(value.round() as i64, self.granularity)
    }
}

// ============================================================================
// SMOOTHING
// ============================================================================

/// How strongly a chart's polyline is curved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingLevel {
    #[default]
    None,
    Rough,
    Gentle,
    Curvy,
}

impl SmoothingLevel {
    /// Fraction of the neighbour span used to place Bezier control points
    pub fn ratio(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Rough => 0.2,
            Self::Gentle => 0.4,
            Self::Curvy => 0.6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rough => "rough",
            Self::Gentle => "gentle",
            Self::Curvy => "curvy",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Rough, Self::Gentle, Self::Curvy]
    }
}

impl std::fmt::Display for SmoothingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SmoothingLevel {
    type Err = WatchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|level| level.label() == s.trim())
            .ok_or_else(|| WatchError::UnknownSmoothing(s.to_string()))
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const ACCENT: &str = "#50e3c2";
    pub const GRID: &str = "#eaeaea";
    pub const TEXT_MUTED: &str = "#666666";
}
