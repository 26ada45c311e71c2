//! Axis gridlines and tick labels
//!
//! All positions come from [`PlotBasis`], the same basis the composer uses to
//! place data points.

use crate::{colors, escape_xml, step_value, PlotBasis, Viewport};
use std::fmt::Write;
use watch_core::ValueFormatter;

/// Interpolation steps across the x-axis (5 labels)
pub const X_TICK_STEPS: usize = 4;

/// Interpolation steps up the y-axis (3 labels)
pub const Y_TICK_STEPS: usize = 2;

/// How far boundary lines run past the plot corner
const OVERHANG: f64 = 5.0;

/// Gap between y labels and the left boundary
const LABEL_GAP: f64 = 5.0;

/// A labelled position along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Pixel coordinate along the axis
    pub position: f64,
    pub value: f64,
    pub label: String,
}

/// X ticks at quarter steps of `x_range`, spread from the left margin to the
/// right edge.
///
/// When adjacent ticks format to the same label, the earlier one is dropped
/// and the later one kept, so the final tick always survives.
pub fn x_ticks(basis: &PlotBasis, x_range: (f64, f64), format: &dyn ValueFormatter) -> Vec<AxisTick> {
    let mut ticks: Vec<AxisTick> = Vec::with_capacity(X_TICK_STEPS + 1);

    for step in 0..=X_TICK_STEPS {
        let value = step_value(x_range, step, X_TICK_STEPS);
        let tick = AxisTick {
            position: step_value((basis.left, basis.width()), step, X_TICK_STEPS),
            value,
            label: format.format(value),
        };

        if ticks.last().is_some_and(|prev| prev.label == tick.label) {
            ticks.pop();
        }
        ticks.push(tick);
    }

    ticks
}

/// Y ticks at half steps of `y_range`, placed where the data path would put
/// the same values.
pub fn y_ticks(basis: &PlotBasis, y_range: (f64, f64), format: &dyn ValueFormatter) -> Vec<AxisTick> {
    (0..=Y_TICK_STEPS)
        .map(|step| {
            let value = step_value(y_range, step, Y_TICK_STEPS);
            AxisTick {
                position: basis.y_for_value(value, y_range.1).round(),
                value,
                label: format.format(value),
            }
        })
        .collect()
}

fn line(out: &mut String, (x1, y1): (f64, f64), (x2, y2): (f64, f64), dashed: bool) {
    write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"{}/>"#,
        x1,
        y1,
        x2,
        y2,
        colors::GRID,
        if dashed { r#" stroke-dasharray="4""# } else { "" }
    )
    .unwrap();
}

fn text(out: &mut String, (x, y): (f64, f64), anchor: &str, dy: Option<&str>, font_size: f64, label: &str) {
    write!(
        out,
        r#"<text x="{}" y="{}"{} text-anchor="{}" font-size="{}" fill="{}">{}</text>"#,
        x,
        y,
        dy.map(|dy| format!(r#" dy="{}""#, dy)).unwrap_or_default(),
        anchor,
        font_size,
        colors::TEXT_MUTED,
        escape_xml(label)
    )
    .unwrap();
}

/// Gridlines and tick labels for a chart of the given viewport
pub fn render_axes(
    viewport: Viewport,
    x_range: (f64, f64),
    x_format: &dyn ValueFormatter,
    y_range: (f64, f64),
    y_format: &dyn ValueFormatter,
) -> String {
    let basis = viewport.basis();
    let PlotBasis {
        left,
        baseline,
        font_size,
        ..
    } = basis;
    let width = basis.width();

    let mut out = String::with_capacity(2048);

    // Vertical lines and y labels
    out.push_str("<g>");
    line(&mut out, (left, 0.0), (left, baseline + OVERHANG), false);
    for division in 1..X_TICK_STEPS {
        let x = (width - left) * division as f64 / X_TICK_STEPS as f64 + left;
        line(&mut out, (x, 0.0), (x, baseline + OVERHANG), true);
    }
    for tick in y_ticks(&basis, y_range, y_format) {
        text(&mut out, (left - LABEL_GAP, tick.position), "end", Some("0.32em"), font_size, &tick.label);
    }
    out.push_str("</g>");

    // Horizontal lines and x labels
    out.push_str("<g>");
    line(&mut out, (left - OVERHANG, baseline), (width, baseline), false);
    line(&mut out, (left - OVERHANG, baseline / 2.0), (width, baseline / 2.0), true);
    let ticks = x_ticks(&basis, x_range, x_format);
    let last = ticks.len().saturating_sub(1);
    for (i, tick) in ticks.iter().enumerate() {
        let anchor = match i {
            0 => "start",
            i if i == last => "end",
            _ => "middle",
        };
        text(&mut out, (tick.position, basis.height()), anchor, None, font_size, &tick.label);
    }
    out.push_str("</g>");

    out
}
