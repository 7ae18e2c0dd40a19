//! Yearly trend figure: the three seasonal series over the years, a marker
//! at the reference year and the reference-to-comparison connectors.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_dashed, draw_markers, render_png, Marker};
use crate::config::Config;
use crate::theme::{self, Figure, HIGHLIGHT, LEGEND_FACE, TEXT};
use crate::{stats, AnnualTable, RenderError, Season};

/// Padding added below and above the temperature axis, in °C.
pub const PADDING: f64 = 0.5;

/// Straight segment between one series' values at two years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub season: Season,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

pub fn connectors(table: &AnnualTable, from: i32, to: i32) -> Result<Vec<Connector>, RenderError> {
    let start = table
        .record(from)
        .ok_or(RenderError::ReferenceYearNotFound(from))?;
    let end = table
        .record(to)
        .ok_or(RenderError::ReferenceYearNotFound(to))?;

    Ok(Season::ALL
        .iter()
        .map(|&season| Connector {
            season,
            from: (from as f64, season.value(start)),
            to: (to as f64, season.value(end)),
        })
        .collect())
}

/// Temperature axis: every series fits with [`PADDING`] to spare.
pub fn y_bounds(table: &AnnualTable) -> Result<Range<f64>, RenderError> {
    table
        .temperature_range()
        .map(|range| stats::padded(range, PADDING))
        .ok_or(RenderError::EmptyTable("annual"))
}

/// One tick per year of the table, first and last included.
pub fn year_ticks(years: &Range<i32>) -> Vec<f64> {
    (years.start..=years.end).map(f64::from).collect()
}

/// Heights of the reference-year annotation: the centre of its label, then
/// the tail and tip of the arrow pointing down at the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub label: f64,
    pub tail: f64,
    pub tip: f64,
}

impl Annotation {
    /// Sits in the padding above the highest value, below the axis top.
    pub fn above(y_max: f64) -> Self {
        Self {
            label: y_max + 0.75 * PADDING,
            tail: y_max + 0.6 * PADDING,
            tip: y_max + 0.4 * PADDING,
        }
    }
}

pub fn render(path: &Path, table: &AnnualTable, config: &Config) -> Result<(), RenderError> {
    let connectors = connectors(table, config.reference_year, config.comparison_year)?;
    let figure = Figure::new(12.0, 8.0, config.dpi);
    render_png(path, figure, |root| {
        draw(root, figure, table, &connectors, config.reference_year)
    })
}

pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: Figure,
    table: &AnnualTable,
    connectors: &[Connector],
    marker_year: i32,
) -> Result<(), RenderError> {
    let years = table.year_range().ok_or(RenderError::EmptyTable("annual"))?;
    let y = y_bounds(table)?;
    let y_max = y.end - PADDING;

    let area = root.titled(
        &format!("Climate Temperature Trends ({}-{})", years.start, years.end),
        figure.bold(16.0),
    )?;
    let mut chart = ChartBuilder::on(&area)
        .caption("Mendocino County", figure.bold(14.0))
        .margin(figure.px(12.0))
        .x_label_area_size(figure.px(44.0))
        .y_label_area_size(figure.px(56.0))
        .build_cartesian_2d(
            (years.start as f64..years.end as f64).with_key_points(year_ticks(&years)),
            y.clone(),
        )?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Average Temperature (°C)")
        .axis_desc_style(figure.bold(14.0))
        .label_style(figure.font(11.0))
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.1}"))
        .bold_line_style(TEXT.mix(0.3).stroke_width(figure.px(0.5)))
        .light_line_style(TRANSPARENT)
        .axis_style(TEXT.mix(0.6))
        .draw()?;

    let swatch = figure.px(20.0) as i32;
    let markers = [Marker::Circle, Marker::Square, Marker::Triangle];
    for (season, marker) in Season::ALL.into_iter().zip(markers) {
        let color = theme::season_color(season);
        let style = color.mix(0.8).stroke_width(figure.px(2.5));
        let points: Vec<(f64, f64)> = table
            .series(season)
            .map(|(year, temp)| (year as f64, temp))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), style))?
            .label(season.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + swatch, y)], style));
        draw_markers(
            &mut chart,
            marker,
            &points,
            figure.px(3.0) as i32,
            color.mix(0.8).filled(),
        )?;
    }

    let marker_style = HIGHLIGHT.mix(0.8).stroke_width(figure.px(2.0));
    draw_dashed(
        &mut chart,
        &[(marker_year as f64, y.start), (marker_year as f64, y.end)],
        24,
        0.6,
        marker_style,
    )?
    .label(format!("{marker_year} Reference"))
    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + swatch, y)], marker_style));

    for connector in connectors {
        let style = theme::season_color(connector.season)
            .mix(0.7)
            .stroke_width(figure.px(3.0));
        let anno = draw_dashed(&mut chart, &[connector.from, connector.to], 40, 0.35, style)?;
        if connector.season == Season::Annual {
            anno.label(format!(
                "{:.0}-{:.0} Trend",
                connector.from.0, connector.to.0
            ))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + swatch, y)], style));
        }
    }

    // Annotation above the data, arrow pointing down at the marker line
    let x = marker_year as f64;
    let annotation = Annotation::above(y_max);
    let label = figure
        .font(10.0)
        .color(&HIGHLIGHT)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let arrow = HIGHLIGHT.mix(0.7).stroke_width(figure.px(1.0));
    let head = figure.px(3.0) as i32;
    chart.draw_series(std::iter::once(Text::new(
        marker_year.to_string(),
        (x, annotation.label),
        label,
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x, annotation.tail), (x, annotation.tip)],
        arrow,
    )))?;
    chart.draw_series(std::iter::once(
        EmptyElement::at((x, annotation.tip))
            + Polygon::new(vec![(0, 0), (-head, -2 * head), (head, -2 * head)], arrow.filled()),
    ))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(LEGEND_FACE.mix(0.9))
        .border_style(TEXT.mix(0.3))
        .label_font(figure.font(11.0))
        .legend_area_size(figure.px(24.0))
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnnualRecord;

    fn sample(years: impl Iterator<Item = i32>) -> AnnualTable {
        AnnualTable::new(
            years
                .map(|year| {
                    let t = (year - 2000) as f64 * 0.1;
                    AnnualRecord {
                        year,
                        winter_temp: 8.0 + t,
                        spring_temp: 14.0 - t,
                        annual_temp: 11.5 + t / 2.0,
                    }
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn connectors_use_stored_values() {
        let table = sample(2000..=2020);
        let connectors = connectors(&table, 2007, 2020).unwrap();
        assert_eq!(connectors.len(), 3);

        let start = table.record(2007).unwrap();
        let end = table.record(2020).unwrap();
        for connector in &connectors {
            assert_eq!(connector.from, (2007.0, connector.season.value(start)));
            assert_eq!(connector.to, (2020.0, connector.season.value(end)));
        }
        assert_eq!(connectors[1].season, Season::Spring);
        assert_eq!(connectors[1].from.1, start.spring_temp);
    }

    #[test]
    fn missing_reference_year() {
        let table = sample((2000..=2020).filter(|year| *year != 2007));
        let err = connectors(&table, 2007, 2020).unwrap_err();
        assert!(matches!(err, RenderError::ReferenceYearNotFound(2007)));

        let table = sample(2000..=2019);
        let err = connectors(&table, 2007, 2020).unwrap_err();
        assert!(matches!(err, RenderError::ReferenceYearNotFound(2020)));
    }

    #[test]
    fn axis_bounds_are_padded_by_half_a_degree() {
        let table = sample(2000..=2020);
        // winter starts lowest, spring starts highest
        let bounds = y_bounds(&table).unwrap();
        assert_eq!(bounds.start, 8.0 - 0.5);
        assert_eq!(bounds.end, 14.0 + 0.5);
        assert!(y_bounds(&AnnualTable::default()).is_err());
    }

    #[test]
    fn one_tick_per_year() {
        let ticks = year_ticks(&(2000..2020));
        assert_eq!(ticks.len(), 21);
        assert_eq!(ticks.first(), Some(&2000.0));
        assert_eq!(ticks.last(), Some(&2020.0));
        assert!(ticks.windows(2).all(|pair| pair[1] - pair[0] == 1.0));
    }

    #[test]
    fn annotation_stays_below_the_axis_top() {
        let table = sample(2000..=2020);
        let bounds = y_bounds(&table).unwrap();
        let annotation = Annotation::above(bounds.end - PADDING);
        assert!(annotation.label < bounds.end);
        assert!(annotation.tail < annotation.label);
        assert!(annotation.tip < annotation.tail);
        assert!(annotation.tip > bounds.end - PADDING);
    }

    #[test]
    fn renders_the_figure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::config::YEARLY_TRENDS_FILE);
        let config = Config {
            dpi: 20,
            ..Config::default()
        };

        render(&path, &sample(2000..=2020), &config).unwrap();
        assert_eq!(
            image::image_dimensions(&path).unwrap(),
            Figure::new(12.0, 8.0, 20).pixels()
        );
    }

    #[test]
    fn no_image_without_reference_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climate_yearly_trends.png");
        let table = sample(2010..=2020);

        let err = render(&path, &table, &Config::default()).unwrap_err();
        assert!(matches!(err, RenderError::ReferenceYearNotFound(2007)));
        assert!(!path.exists());
    }
}
