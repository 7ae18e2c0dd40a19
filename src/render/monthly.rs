//! Monthly comparison figure: grouped bars for the two reference years on
//! top, the stored per-month difference below.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{category_label, render_png};
use crate::config::Config;
use crate::theme::{Figure, LEGEND_FACE, SPRING, TEXT, WINTER};
use crate::{stats, MonthlyTable, RenderError};

/// Width of each bar of a pair, in month slots.
pub const BAR_WIDTH: f64 = 0.35;
/// Width of a difference bar, in month slots.
pub const DIFF_BAR_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

/// Numeric label printed next to a difference bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLabel {
    pub text: String,
    pub y: f64,
    pub placement: Placement,
}

/// Positive differences are labelled just above the bar end, everything
/// else just below it.
pub fn diff_label(diff: f64) -> BarLabel {
    let text = format!("{diff:.1}°C");
    if diff > 0.0 {
        BarLabel {
            text,
            y: diff + 0.1,
            placement: Placement::Above,
        }
    } else {
        BarLabel {
            text,
            y: diff - 0.2,
            placement: Placement::Below,
        }
    }
}

/// Value axis of a bar chart: bars grow from zero so zero is always
/// included, plus a 10% margin of the covered span.
pub fn bar_bounds(values: impl Iterator<Item = f64> + Clone) -> Range<f64> {
    let range = stats::value_range(values.chain([0.0])).unwrap_or(0.0..1.0);
    let span = range.end - range.start;
    let margin = if span > 0.0 { span * 0.1 } else { 0.5 };
    stats::padded(range, margin)
}

pub fn render(path: &Path, table: &MonthlyTable, config: &Config) -> Result<(), RenderError> {
    if table.is_empty() {
        return Err(RenderError::EmptyTable("monthly"));
    }
    let figure = Figure::new(14.0, 10.0, config.dpi);
    render_png(path, figure, |root| {
        draw(
            root,
            figure,
            table,
            (config.reference_year, config.comparison_year),
        )
    })
}

pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: Figure,
    table: &MonthlyTable,
    (year_a, year_b): (i32, i32),
) -> Result<(), RenderError> {
    let records = table.records();
    if records.is_empty() {
        return Err(RenderError::EmptyTable("monthly"));
    }

    let labels: Vec<String> = records.iter().map(|r| r.month_label.clone()).collect();
    let x = -0.5..records.len() as f64 - 0.5;
    let areas = root.split_evenly((2, 1));
    let swatch = figure.px(14.0) as i32;

    // Temperatures of both years side by side
    let y = bar_bounds(
        records
            .iter()
            .flat_map(|r| [r.temp_year_a, r.temp_year_b]),
    );
    let mut chart = ChartBuilder::on(&areas[0])
        .caption(
            format!("Monthly Temperature Comparison: {year_a} vs {year_b} - Mendocino County"),
            figure.bold(14.0),
        )
        .margin(figure.px(10.0))
        .x_label_area_size(figure.px(40.0))
        .y_label_area_size(figure.px(50.0))
        .build_cartesian_2d(x.clone(), y)?;
    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Temperature (°C)")
        .axis_desc_style(figure.bold(12.0))
        .label_style(figure.font(10.0))
        .x_labels(labels.len() + 1)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .bold_line_style(TEXT.mix(0.3))
        .light_line_style(TRANSPARENT)
        .axis_style(TEXT.mix(0.6))
        .draw()?;

    let style_a = WINTER.mix(0.8).filled();
    chart
        .draw_series(records.iter().enumerate().map(|(i, r)| {
            let x = i as f64;
            Rectangle::new([(x - BAR_WIDTH, 0.0), (x, r.temp_year_a)], style_a)
        }))?
        .label(year_a.to_string())
        .legend(move |(x, y)| Rectangle::new([(x, y - swatch / 3), (x + swatch, y + swatch / 3)], style_a));
    let style_b = SPRING.mix(0.8).filled();
    chart
        .draw_series(records.iter().enumerate().map(|(i, r)| {
            let x = i as f64;
            Rectangle::new([(x, 0.0), (x + BAR_WIDTH, r.temp_year_b)], style_b)
        }))?
        .label(year_b.to_string())
        .legend(move |(x, y)| Rectangle::new([(x, y - swatch / 3), (x + swatch, y + swatch / 3)], style_b));
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(LEGEND_FACE.mix(0.9))
        .border_style(TEXT.mix(0.3))
        .label_font(figure.font(11.0))
        .draw()?;

    // Stored difference per month
    let labels_at = records.iter().map(|r| diff_label(r.diff));
    let y = bar_bounds(
        records
            .iter()
            .map(|r| r.diff)
            .chain(labels_at.clone().map(|label| label.y)),
    );
    let mut chart = ChartBuilder::on(&areas[1])
        .caption(
            format!("Temperature Change ({year_b} - {year_a})"),
            figure.bold(14.0),
        )
        .margin(figure.px(10.0))
        .x_label_area_size(figure.px(40.0))
        .y_label_area_size(figure.px(50.0))
        .build_cartesian_2d(x.clone(), y)?;
    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Temperature Difference (°C)")
        .axis_desc_style(figure.bold(12.0))
        .label_style(figure.font(10.0))
        .x_labels(labels.len() + 1)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format!("{y:.1}"))
        .bold_line_style(TEXT.mix(0.3))
        .light_line_style(TRANSPARENT)
        .axis_style(TEXT.mix(0.6))
        .draw()?;

    chart.draw_series(records.iter().enumerate().map(|(i, r)| {
        let x = i as f64;
        let color = if r.diff > 0.0 { SPRING } else { WINTER };
        Rectangle::new(
            [(x - DIFF_BAR_WIDTH / 2.0, 0.0), (x + DIFF_BAR_WIDTH / 2.0, r.diff)],
            color.mix(0.8).filled(),
        )
    }))?;
    chart.draw_series(LineSeries::new(
        [(x.start, 0.0), (x.end, 0.0)],
        TEXT.mix(0.5).stroke_width(figure.px(1.0)),
    ))?;

    let font = figure.bold(9.0);
    chart.draw_series(labels_at.enumerate().map(|(i, label)| {
        let anchor = match label.placement {
            Placement::Above => VPos::Bottom,
            Placement::Below => VPos::Top,
        };
        Text::new(
            label.text,
            (i as f64, label.y),
            font.pos(Pos::new(HPos::Center, anchor)),
        )
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MonthlyRecord;

    #[test]
    fn warming_is_labelled_above() {
        let label = diff_label(1.2);
        assert_eq!(label.text, "1.2°C");
        assert_eq!(label.placement, Placement::Above);
        assert!((label.y - 1.3).abs() < 1e-12);
    }

    #[test]
    fn cooling_is_labelled_below() {
        let label = diff_label(-0.8);
        assert_eq!(label.text, "-0.8°C");
        assert_eq!(label.placement, Placement::Below);
        assert!((label.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_change_is_labelled_below() {
        assert_eq!(diff_label(0.0).placement, Placement::Below);
    }

    #[test]
    fn bars_start_at_zero() {
        let bounds = bar_bounds([8.0, 18.0].into_iter());
        assert!(bounds.start < 0.0);
        assert!(bounds.end > 18.0);

        let bounds = bar_bounds([-1.0, -0.5].into_iter());
        assert!(bounds.start < -1.0);
        assert!(bounds.end > 0.0);
    }

    fn sample() -> MonthlyTable {
        let months = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        MonthlyTable::new(
            months
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let diff = (i as f64 - 5.0) * 0.3;
                    MonthlyRecord {
                        month_label: name.to_string(),
                        month: crate::label::Label::classify(name).month(),
                        temp_year_a: 9.0 + i as f64,
                        temp_year_b: 9.0 + i as f64 + diff,
                        diff,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn renders_the_figure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::config::MONTHLY_COMPARISON_FILE);
        let config = Config {
            dpi: 20,
            ..Config::default()
        };

        render(&path, &sample(), &config).unwrap();
        assert_eq!(
            image::image_dimensions(&path).unwrap(),
            Figure::new(14.0, 10.0, 20).pixels()
        );
    }

    #[test]
    fn empty_table_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climate_monthly_comparison.png");
        let err = render(&path, &MonthlyTable::new(Vec::<MonthlyRecord>::new()), &Config::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyTable("monthly")));
        assert!(!path.exists());
    }
}
