//! Summary figure, four panels:
//!
//! ```text
//!  ┌──────────────────────┬──────────────────────┐
//!  │ trends + regression  │ distribution         │
//!  ├──────────────────────┼──────────────────────┤
//!  │ monthly comparison   │ difference heatmap   │
//!  └──────────────────────┴──────────────────────┘
//! ```

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{category_label, dashes, draw_dashed, draw_markers, render_png, Chart, Marker};
use crate::config::Config;
use crate::render::yearly;
use crate::stats::{self, LinearFit};
use crate::theme::{self, Diverging, Figure, HIGHLIGHT, LEGEND_FACE, SPRING, TEXT, WINTER};
use crate::{AnnualTable, MonthlyTable, RenderError, Season, Tables};

/// Bins of each seasonal histogram.
pub const HISTOGRAM_BINS: usize = 8;
/// Strips drawn to approximate the continuous colour bar.
const COLOR_BAR_STEPS: usize = 200;

pub fn render(path: &Path, tables: &Tables, config: &Config) -> Result<(), RenderError> {
    if tables.annual.is_empty() {
        return Err(RenderError::EmptyTable("annual"));
    }
    if tables.monthly.is_empty() {
        return Err(RenderError::EmptyTable("monthly"));
    }
    let figure = Figure::new(16.0, 12.0, config.dpi);
    render_png(path, figure, |root| draw(root, figure, tables, config))
}

pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: Figure,
    tables: &Tables,
    config: &Config,
) -> Result<(), RenderError> {
    let areas = root.split_evenly((2, 2));
    draw_trends(&areas[0], figure, &tables.annual, config.reference_year)?;
    draw_distribution(&areas[1], figure, &tables.annual)?;
    draw_monthly(
        &areas[2],
        figure,
        &tables.monthly,
        (config.reference_year, config.comparison_year),
    )?;
    draw_heatmap(
        &areas[3],
        figure,
        &tables.monthly,
        (config.reference_year, config.comparison_year),
    )?;
    Ok(())
}

/// Least-squares line of each series, sampled at the series' own years.
pub fn trend_line(table: &AnnualTable, season: Season) -> Option<Vec<(f64, f64)>> {
    let points: Vec<(f64, f64)> = table
        .series(season)
        .map(|(year, temp)| (year as f64, temp))
        .collect();
    let fit = LinearFit::new(&points)?;
    Some(points.iter().map(|&(x, _)| (x, fit.eval(x))).collect())
}

/// Label every `every` years, only on whole years.
fn year_tick(x: f64, every: i32) -> String {
    let year = x.round();
    if (x - year).abs() > 1e-6 || (year as i32).rem_euclid(every) != 0 {
        return String::new();
    }
    format!("{year:.0}")
}

fn style_mesh<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    figure: Figure,
    x_desc: &str,
    y_desc: &str,
    x_labels: usize,
    x_formatter: &dyn Fn(&f64) -> String,
) -> Result<(), RenderError> {
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style(figure.bold(10.0))
        .label_style(figure.font(10.0))
        .x_labels(x_labels)
        .x_label_formatter(x_formatter)
        .y_label_formatter(&|y| format!("{y:.1}"))
        .bold_line_style(TEXT.mix(0.3))
        .light_line_style(TRANSPARENT)
        .axis_style(TEXT.mix(0.6))
        .draw()?;
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    figure: Figure,
) -> Result<(), RenderError> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(LEGEND_FACE.mix(0.9))
        .border_style(TEXT.mix(0.3))
        .label_font(figure.font(10.0))
        .draw()?;
    Ok(())
}

fn draw_trends<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: Figure,
    table: &AnnualTable,
    marker_year: i32,
) -> Result<(), RenderError> {
    let years = table.year_range().ok_or(RenderError::EmptyTable("annual"))?;
    let y = yearly::y_bounds(table)?;

    let mut chart = ChartBuilder::on(area)
        .caption("Temperature Trends with Regression Lines", figure.bold(12.0))
        .margin(figure.px(10.0))
        .x_label_area_size(figure.px(32.0))
        .y_label_area_size(figure.px(40.0))
        .build_cartesian_2d(years.start as f64 - 0.5..years.end as f64 + 0.5, y.clone())?;
    style_mesh(
        &mut chart,
        figure,
        "Year",
        "Temperature (°C)",
        (years.end - years.start + 2) as usize,
        &|x| year_tick(*x, 2),
    )?;

    let swatch = figure.px(5.0) as i32;
    for season in Season::ALL {
        let color = theme::season_color(season);
        let points: Vec<(f64, f64)> = table
            .series(season)
            .map(|(year, temp)| (year as f64, temp))
            .collect();

        let fill = color.mix(0.7).filled();
        chart
            .draw_series(points.iter().map(|&point| Circle::new(point, swatch, fill)))?
            .label(season.name())
            .legend(move |(x, y)| Circle::new((x + swatch, y), swatch, fill));

        match trend_line(table, season) {
            Some(line) => {
                let style = color.mix(0.8).stroke_width(figure.px(2.0));
                chart.draw_series(
                    dashed_segments(&line)
                        .into_iter()
                        .map(|segment| PathElement::new(segment, style)),
                )?;
            }
            None => log::warn!("not enough years to fit a {} trend", season.name()),
        }
    }

    draw_dashed(
        &mut chart,
        &[(marker_year as f64, y.start), (marker_year as f64, y.end)],
        40,
        0.3,
        HIGHLIGHT.mix(0.7).stroke_width(figure.px(1.5)),
    )?;
    draw_legend(&mut chart, figure)
}

/// A fitted line is straight, so its dashes run from the first to the last
/// sample.
fn dashed_segments(line: &[(f64, f64)]) -> Vec<[(f64, f64); 2]> {
    match (line.first(), line.last()) {
        (Some(&first), Some(&last)) => dashes(first, last, 24, 0.6),
        _ => Vec::new(),
    }
}

fn draw_distribution<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: Figure,
    table: &AnnualTable,
) -> Result<(), RenderError> {
    let histograms: Vec<(Season, Vec<stats::Bin>)> = Season::ALL
        .into_iter()
        .map(|season| {
            let values: Vec<f64> = table.series(season).map(|(_, temp)| temp).collect();
            (season, stats::histogram(&values, HISTOGRAM_BINS))
        })
        .collect();

    let bins = histograms.iter().flat_map(|(_, bins)| bins);
    let x = stats::value_range(bins.clone().flat_map(|bin| [bin.range.start, bin.range.end]))
        .ok_or(RenderError::EmptyTable("annual"))?;
    let top = bins.map(|bin| bin.density).fold(0.0, f64::max);
    let x = stats::padded(x.clone(), (x.end - x.start) * 0.05);

    let mut chart = ChartBuilder::on(area)
        .caption("Temperature Distribution by Season", figure.bold(12.0))
        .margin(figure.px(10.0))
        .x_label_area_size(figure.px(32.0))
        .y_label_area_size(figure.px(40.0))
        .build_cartesian_2d(x, 0.0..top * 1.1)?;
    style_mesh(
        &mut chart,
        figure,
        "Temperature (°C)",
        "Density",
        10,
        &|x| format!("{x:.0}"),
    )?;

    let swatch = figure.px(10.0) as i32;
    for (season, bins) in &histograms {
        let fill = theme::season_color(*season).mix(0.7).filled();
        chart
            .draw_series(bins.iter().map(|bin| {
                Rectangle::new([(bin.range.start, 0.0), (bin.range.end, bin.density)], fill)
            }))?
            .label(season.name())
            .legend(move |(x, y)| Rectangle::new([(x, y - swatch / 2), (x + swatch, y + swatch / 2)], fill));
    }
    draw_legend(&mut chart, figure)
}

fn draw_monthly<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: Figure,
    table: &MonthlyTable,
    (year_a, year_b): (i32, i32),
) -> Result<(), RenderError> {
    let records = table.records();
    let labels: Vec<String> = records.iter().map(|r| r.short_label()).collect();
    let temps = records.iter().flat_map(|r| [r.temp_year_a, r.temp_year_b]);
    let y = stats::value_range(temps).ok_or(RenderError::EmptyTable("monthly"))?;
    let y = stats::padded(y, 1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Monthly Comparison: {year_a} vs {year_b}"),
            figure.bold(12.0),
        )
        .margin(figure.px(10.0))
        .x_label_area_size(figure.px(32.0))
        .y_label_area_size(figure.px(40.0))
        .build_cartesian_2d(-0.5..records.len() as f64 - 0.5, y)?;
    style_mesh(
        &mut chart,
        figure,
        "Month",
        "Temperature (°C)",
        labels.len() + 1,
        &|x| category_label(&labels, *x),
    )?;

    let swatch = figure.px(20.0) as i32;
    let series = [
        (year_a, WINTER, Marker::Circle, records.iter().map(|r| r.temp_year_a).collect::<Vec<_>>()),
        (year_b, SPRING, Marker::Square, records.iter().map(|r| r.temp_year_b).collect()),
    ];
    for (year, color, marker, temps) in series {
        let points: Vec<(f64, f64)> = temps
            .into_iter()
            .enumerate()
            .map(|(i, temp)| (i as f64, temp))
            .collect();
        let style = color.stroke_width(figure.px(2.5));
        chart
            .draw_series(LineSeries::new(points.iter().copied(), style))?
            .label(year.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + swatch, y)], style));
        draw_markers(&mut chart, marker, &points, figure.px(4.0) as i32, color.filled())?;
    }
    draw_legend(&mut chart, figure)
}

fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: Figure,
    table: &MonthlyTable,
    (year_a, year_b): (i32, i32),
) -> Result<(), RenderError> {
    let records = table.records();
    let labels: Vec<String> = records.iter().map(|r| r.short_label()).collect();
    let colors = Diverging::centered(records.iter().map(|r| r.diff));
    let (cells_area, bar_area) = area.split_vertically(70.percent_height());

    let mut chart = ChartBuilder::on(&cells_area)
        .caption(
            format!("Temperature Change Heatmap ({year_b}-{year_a})"),
            figure.bold(12.0),
        )
        .margin(figure.px(10.0))
        .x_label_area_size(figure.px(24.0))
        .y_label_area_size(figure.px(40.0))
        .build_cartesian_2d(-0.5..records.len() as f64 - 0.5, 0.0..1.0)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .label_style(figure.font(10.0))
        .x_labels(labels.len() + 1)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_labels(0)
        .axis_style(TEXT.mix(0.6))
        .draw()?;
    chart.draw_series(records.iter().enumerate().map(|(i, r)| {
        let x = i as f64;
        Rectangle::new(
            [(x - 0.5, 0.0), (x + 0.5, 1.0)],
            colors.color(r.diff).mix(0.8).filled(),
        )
    }))?;

    // Colour bar, same scale as the cells
    let bound = colors.bound();
    let mut bar = ChartBuilder::on(&bar_area)
        .margin(figure.px(10.0))
        .x_label_area_size(figure.px(36.0))
        .y_label_area_size(figure.px(40.0))
        .build_cartesian_2d(-bound..bound, 0.0..1.0)?;
    bar.configure_mesh()
        .disable_mesh()
        .x_desc("Temperature Change (°C)")
        .axis_desc_style(figure.bold(10.0))
        .label_style(figure.font(10.0))
        .x_labels(9)
        .x_label_formatter(&|x| format!("{x:.1}"))
        .y_labels(0)
        .axis_style(TEXT.mix(0.6))
        .draw()?;
    let step = 2.0 * bound / COLOR_BAR_STEPS as f64;
    bar.draw_series((0..COLOR_BAR_STEPS).map(|k| {
        let low = -bound + k as f64 * step;
        Rectangle::new(
            [(low, 0.0), (low + step, 1.0)],
            colors.color(low + step / 2.0).mix(0.8).filled(),
        )
    }))?;

    Ok(())
}
