//! Figure rendering.
//!
//! Each figure is drawn into an in-memory RGB buffer and only encoded to
//! PNG once every element has been drawn, so a failing figure never leaves
//! a partial image behind.

use std::path::Path;

use plotters::chart::SeriesAnno;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::theme::{Figure, FACE};
use crate::RenderError;

pub mod monthly;
pub mod summary;
pub mod yearly;

/// Chart with a temperature y axis; the x axis defaults to a plain `f64`
/// range and may carry bound key points instead.
pub type Chart<'a, DB, X = RangedCoordf64> = ChartContext<'a, DB, Cartesian2d<X, RangedCoordf64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

/// Draw one `marker` of radius `size` pixels at each point.
pub fn draw_markers<DB: DrawingBackend, X: Ranged<ValueType = f64>>(
    chart: &mut Chart<'_, DB, X>,
    marker: Marker,
    points: &[(f64, f64)],
    size: i32,
    style: ShapeStyle,
) -> Result<(), RenderError> {
    let points = points.iter().copied();
    match marker {
        Marker::Circle => {
            chart.draw_series(points.map(|point| Circle::new(point, size, style)))?;
        }
        Marker::Square => {
            chart.draw_series(points.map(|point| {
                EmptyElement::at(point) + Rectangle::new([(-size, -size), (size, size)], style)
            }))?;
        }
        Marker::Triangle => {
            chart.draw_series(points.map(|point| TriangleMarker::new(point, size, style)))?;
        }
    }
    Ok(())
}

/// Draw dashes along a polyline; returns the annotation handle of the series
/// so callers can attach a legend entry.
pub fn draw_dashed<'a, 'b, DB: DrawingBackend + 'a, X: Ranged<ValueType = f64>>(
    chart: &'b mut Chart<'a, DB, X>,
    points: &[(f64, f64)],
    pieces: usize,
    duty: f64,
    style: ShapeStyle,
) -> Result<&'b mut SeriesAnno<'a, DB>, RenderError> {
    let segments = dashed_path(points, pieces, duty);
    Ok(chart.draw_series(
        segments
            .into_iter()
            .map(move |segment| PathElement::new(segment, style)),
    )?)
}

/// Draw a figure with `draw` and write it to `path` as PNG.
pub fn render_png<F>(path: &Path, figure: Figure, draw: F) -> Result<(), RenderError>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), RenderError>,
{
    let (width, height) = figure.pixels();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&FACE)?;
        draw(&root)?;
        root.present()?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or(RenderError::Buffer(width, height))?;
    image.save(path).map_err(|source| RenderError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {}x{} image to {}", width, height, path.display());

    Ok(())
}

/// Split the segment `from`..`to` into `pieces` dashes, each covering
/// `duty` of its slot. Endpoints of the first and last dash coincide with
/// `from` and `to` when `duty` is 1.
pub fn dashes(from: (f64, f64), to: (f64, f64), pieces: usize, duty: f64) -> Vec<[(f64, f64); 2]> {
    let lerp = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
    (0..pieces)
        .map(|i| {
            let start = i as f64 / pieces as f64;
            let end = start + duty / pieces as f64;
            [lerp(start), lerp(end)]
        })
        .collect()
}

/// Same as [`dashes`] but along a polyline, one dash pattern per leg.
pub fn dashed_path(points: &[(f64, f64)], pieces: usize, duty: f64) -> Vec<[(f64, f64); 2]> {
    points
        .windows(2)
        .flat_map(|leg| dashes(leg[0], leg[1], pieces, duty))
        .collect()
}

/// Tick label of a categorical axis laid out on `0..labels.len()`.
/// Only whole indices get a label.
pub fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
