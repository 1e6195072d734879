use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{DisplayOptions, IndexName, PreparedSeries};

/// Errors raised while rendering a chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Not enough data to generate chart")]
    NoData,
    #[error("{0}")]
    Draw(String),
    #[error("Failed to read chart file: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_error(step: &str, e: impl std::fmt::Display) -> ChartError {
    ChartError::Draw(format!("Failed to {}: {}", step, e))
}

/// Chart caption, e.g. "NIFTY / BANKNIFTY - Last 90 Days"
pub fn chart_title(options: &DisplayOptions) -> String {
    let names: Vec<&str> = options.indices().iter().map(IndexName::as_str).collect();
    format!("{} - Last {} Days", names.join(" / "), options.period_days())
}

pub fn y_axis_label(normalize: bool) -> &'static str {
    if normalize {
        "Normalized Value (0–1)"
    } else {
        "Closing Price"
    }
}

fn series_color(index: IndexName) -> RGBColor {
    match index {
        IndexName::Nifty => BLUE,
        IndexName::BankNifty => RGBColor(0, 150, 60),
    }
}

/// Earliest and latest date over all series, padded when they coincide
pub fn date_range(prepared: &BTreeMap<IndexName, PreparedSeries>) -> Option<(NaiveDate, NaiveDate)> {
    let dates = prepared.values().flat_map(|s| s.points().iter().map(|p| p.date));
    let (min, max) = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })?;

    if min == max {
        Some((min - Duration::days(1), max + Duration::days(1)))
    } else {
        Some((min, max))
    }
}

/// Y axis bounds with headroom for the latest-value annotation
pub fn value_range(prepared: &BTreeMap<IndexName, PreparedSeries>, normalize: bool) -> (f64, f64) {
    if normalize {
        return (-0.1, 1.15);
    }

    let values = prepared.values().flat_map(|s| s.points().iter().map(|p| p.value));
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let max = values.fold(f64::NEG_INFINITY, f64::max);

    let padding = if max > min {
        (max - min) * 0.1
    } else {
        (max.abs() * 0.01).max(1.0)
    };
    (min - padding, max + padding)
}

/// Render the prepared series as a line chart and return PNG bytes.
///
/// Series are drawn in their display order. With `highlight_latest` each
/// series' latest point gets a red marker and its value printed above it.
pub fn generate_chart(
    prepared: &BTreeMap<IndexName, PreparedSeries>,
    options: &DisplayOptions,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ChartError> {
    let x_range = date_range(prepared).ok_or(ChartError::NoData)?;
    let y_range = value_range(prepared, options.normalize);

    let temp_file = std::env::temp_dir().join(format!("index_tracker_chart_{}.png", Uuid::new_v4()));
    debug!("Rendering chart to {}", temp_file.display());

    let result = draw_chart(&temp_file, prepared, options, (width, height), x_range, y_range)
        .and_then(|_| fs::read(&temp_file).map_err(ChartError::from));

    if let Err(e) = fs::remove_file(&temp_file) {
        warn!("Failed to delete temporary chart file {}: {}", temp_file.display(), e);
    }

    result
}

fn draw_chart(
    path: &Path,
    prepared: &BTreeMap<IndexName, PreparedSeries>,
    options: &DisplayOptions,
    size: (u32, u32),
    (x_min, x_max): (NaiveDate, NaiveDate),
    (y_min, y_max): (f64, f64),
) -> Result<(), ChartError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_error("fill canvas", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(options), ("sans-serif", 32.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| draw_error("build chart", e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_axis_label(options.normalize))
        .x_labels(10)
        .x_label_formatter(&|d: &NaiveDate| d.format("%d %b %y").to_string())
        .draw()
        .map_err(|e| draw_error("draw mesh", e))?;

    for series in prepared.values() {
        let color = series_color(series.index());
        let line = series.points().iter().map(|p| (p.date, p.value));

        chart
            .draw_series(LineSeries::new(line, color.stroke_width(2)))
            .map_err(|e| draw_error("draw line", e))?
            .label(series.index().as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(
                series
                    .points()
                    .iter()
                    .map(|p| Circle::new((p.date, p.value), 3, color.filled())),
            )
            .map_err(|e| draw_error("draw points", e))?;

        if options.highlight_latest {
            let latest = series.latest_point();
            chart
                .draw_series(PointSeries::of_element(
                    vec![(latest.date, latest.value)],
                    7,
                    &RED,
                    &|coord: (NaiveDate, f64), size: i32, style: ShapeStyle| {
                        EmptyElement::at(coord)
                            + Circle::new((0, 0), size, style.filled())
                            + Text::new(
                                format!("{:.2}", coord.1),
                                (-18, -28),
                                ("sans-serif", 16.0).into_font().color(&RED),
                            )
                    },
                ))
                .map_err(|e| draw_error("highlight latest point", e))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| draw_error("draw legend", e))?;

    root.present().map_err(|e| draw_error("render chart", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataPoint, Period, TimeSeries};
    use crate::services::series_service;
    use std::collections::BTreeSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn prepared(values: &[(u32, f64)], normalize: bool) -> BTreeMap<IndexName, PreparedSeries> {
        let series = TimeSeries::from_points(values.iter().map(|&(d, v)| DataPoint::new(day(d), v)).collect());
        let mut raw = BTreeMap::new();
        raw.insert(IndexName::Nifty, series);
        let options = DisplayOptions::new(
            BTreeSet::from([IndexName::Nifty]),
            Period::Days30,
            normalize,
            true,
            true,
        )
        .unwrap();
        series_service::prepare(&raw, &options).unwrap()
    }

    #[test]
    fn test_chart_title() {
        assert_eq!(chart_title(&DisplayOptions::default()), "NIFTY / BANKNIFTY - Last 90 Days");
    }

    #[test]
    fn test_y_axis_label() {
        assert_eq!(y_axis_label(true), "Normalized Value (0–1)");
        assert_eq!(y_axis_label(false), "Closing Price");
    }

    #[test]
    fn test_date_range_ignores_display_order() {
        let series = prepared(&[(1, 10.0), (2, 12.0), (9, 11.0)], false);
        assert_eq!(date_range(&series), Some((day(1), day(9))));
    }

    #[test]
    fn test_date_range_single_point_is_padded() {
        let series = prepared(&[(5, 10.0)], false);
        assert_eq!(date_range(&series), Some((day(4), day(6))));
    }

    #[test]
    fn test_value_range_padding() {
        let series = prepared(&[(1, 100.0), (2, 200.0)], false);
        assert_eq!(value_range(&series, false), (90.0, 210.0));
        assert_eq!(value_range(&series, true), (-0.1, 1.15));

        let flat = prepared(&[(1, 50.0), (2, 50.0)], false);
        assert_eq!(value_range(&flat, false), (49.0, 51.0));
    }

    #[test]
    fn test_generate_chart_without_data() {
        let empty = BTreeMap::new();
        let result = generate_chart(&empty, &DisplayOptions::default(), 800, 400);
        assert!(matches!(result, Err(ChartError::NoData)));
    }
}
