//! # chartkit
//!
//! Core chart primitives: pixel points, interpolation, SVG path building and
//! Bezier smoothing.

use std::f64::consts::PI;
use std::fmt::Write;
use watch_core::SmoothingLevel;

// ============================================================================
// POINTS
// ============================================================================

/// Pixel-space point; y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn rounded(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Linear interpolation `step / max_step` of the way through `range`
pub fn step_value(range: (f64, f64), step: usize, max_step: usize) -> f64 {
    (range.1 - range.0) * step as f64 / max_step as f64 + range.0
}

/// Escape text for use in SVG content or attribute values
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    fn separate(&mut self) {
        if !self.commands.is_empty() {
            self.commands.push(' ');
        }
    }

    pub fn move_to(mut self, to: Point) -> Self {
        self.separate();
        write!(self.commands, "M {},{}", to.x, to.y).unwrap();
        self
    }

    pub fn cubic_to(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.separate();
        write!(
            self.commands,
            "C {},{} {},{} {},{}",
            c1.x, c1.y, c2.x, c2.y, to.x, to.y
        )
        .unwrap();
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

// ============================================================================
// SMOOTHING
// ============================================================================

/// Length and angle of the segment from `a` to `b`
fn segment(a: Point, b: Point) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx.hypot(dy), dy.atan2(dx))
}

/// Control point for `current`, pushed along the `previous -> next` tangent.
///
/// Missing neighbours fall back to `current`. The y is pinned to 0 when the
/// anchor is not strictly below the top edge, so curves resting on that
/// line do not overshoot it.
fn control_point(
    current: Point,
    previous: Option<Point>,
    next: Option<Point>,
    ratio: f64,
    reverse: bool,
) -> Point {
    let (length, angle) = segment(previous.unwrap_or(current), next.unwrap_or(current));
    let angle = if reverse { angle + PI } else { angle };
    let length = length * ratio;

    let x = current.x + angle.cos() * length;
    let y = current.y + angle.sin() * length;
    Point::new(x, if current.y > 0.0 { y } else { 0.0 })
}

/// Bezier path through `points` using an explicit smoothing `ratio`.
///
/// The first point is a move-to; every later point is a cubic curve-to. A
/// ratio of 0 yields straight segments expressed as cubic commands.
pub fn smooth_with_ratio(points: &[Point], ratio: f64) -> String {
    let Some(&first) = points.first() else {
        return String::new();
    };

    let at = |i: Option<usize>| i.and_then(|i| points.get(i).copied());

    let mut builder = PathBuilder::new().move_to(first);
    for i in 1..points.len() {
        let point = points[i];
        let prev = points[i - 1];

        let start = control_point(prev, at(i.checked_sub(2)), Some(point), ratio, false);
        let end = control_point(point, Some(prev), at(Some(i + 1)), ratio, true);
        builder = builder.cubic_to(start, end, point);
    }

    builder.build()
}

/// Bezier path through `points` at the given smoothing level
pub fn smooth(points: &[Point], level: SmoothingLevel) -> String {
    smooth_with_ratio(points, level.ratio())
}

// ============================================================================
// TESTS
// ============================================================================
