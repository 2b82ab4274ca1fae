//! SVG line charts.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::{CliError, Result};

const CHART_SIZE: (u32, u32) = (960, 600);

/// One labelled series of (x, y) points.
#[derive(Debug, Clone)]
pub struct Curve {
    pub label: String,
    pub color: RGBAColor,
    pub points: Vec<(f64, f64)>,
}

impl Curve {
    pub fn new(label: impl Into<String>, color: RGBAColor, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            color,
            points,
        }
    }
}

/// Axis titles and caption.
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// Render curves on linear axes.
pub fn render_linear(path: &Path, labels: ChartLabels<'_>, curves: &[Curve]) -> Result<()> {
    let curves = finite_only(curves, false);
    draw_linear(path, labels, &curves).map_err(|err| render_error(path, err))
}

/// Render curves on log-log axes; non-positive points are dropped.
pub fn render_log_log(path: &Path, labels: ChartLabels<'_>, curves: &[Curve]) -> Result<()> {
    let curves = finite_only(curves, true);
    draw_log_log(path, labels, &curves).map_err(|err| render_error(path, err))
}

fn draw_linear(
    path: &Path,
    labels: ChartLabels<'_>,
    curves: &[Curve],
) -> std::result::Result<(), Box<dyn Error>> {
    let (x_range, y_range) = bounds(curves, false);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 24.0).into_font())
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    chart
        .configure_mesh()
        .x_desc(labels.x)
        .y_desc(labels.y)
        .draw()?;

    for curve in curves {
        let color = curve.color;
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_log_log(
    path: &Path,
    labels: ChartLabels<'_>,
    curves: &[Curve],
) -> std::result::Result<(), Box<dyn Error>> {
    let (x_range, y_range) = bounds(curves, true);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 24.0).into_font())
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(
            (x_range.0..x_range.1).log_scale(),
            (y_range.0..y_range.1).log_scale(),
        )?;

    chart
        .configure_mesh()
        .x_desc(labels.x)
        .y_desc(labels.y)
        .x_label_formatter(&|v| format!("{:.0e}", v))
        .y_label_formatter(&|v| format!("{:.0e}", v))
        .draw()?;

    for curve in curves {
        let color = curve.color;
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn finite_only(curves: &[Curve], positive: bool) -> Vec<Curve> {
    curves
        .iter()
        .map(|curve| Curve {
            points: curve
                .points
                .iter()
                .copied()
                .filter(|(x, y)| {
                    x.is_finite() && y.is_finite() && (!positive || (*x > 0.0 && *y > 0.0))
                })
                .collect(),
            ..curve.clone()
        })
        .collect()
}

/// Axis ranges covering every point, padded so flat curves stay visible.
fn bounds(curves: &[Curve], log: bool) -> ((f64, f64), (f64, f64)) {
    let points = || curves.iter().flat_map(|c| c.points.iter());
    let span = |values: Vec<f64>| -> (f64, f64) {
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !(lo.is_finite() && hi.is_finite()) {
            return if log { (1e-16, 1.0) } else { (0.0, 1.0) };
        }
        if log {
            (lo / 2.0, hi * 2.0)
        } else {
            let pad = ((hi - lo) * 0.05).max(hi.abs().max(1e-12) * 1e-6);
            (lo - pad, hi + pad)
        }
    };

    (
        span(points().map(|p| p.0).collect()),
        span(points().map(|p| p.1).collect()),
    )
}

fn render_error(path: &Path, err: Box<dyn Error>) -> CliError {
    CliError::Render {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}
