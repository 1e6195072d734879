use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::models::{DataPoint, DisplayOptions, IndexName, PreparedSeries, TimeSeries};

/// Errors raised while preparing series for display
#[derive(Debug, Error, PartialEq)]
pub enum PrepareError {
    #[error("No data available for {0}")]
    MissingIndexData(IndexName),
    #[error("No data available for {0} (empty series)")]
    EmptySeries(IndexName),
}

/// Turn fetched series into the series that get charted and exported.
///
/// Each requested index is handled on its own: window to the last
/// `period_days` points, capture the latest point by date, optionally
/// min-max normalize, optionally reverse. No alignment across indices.
pub fn prepare(
    raw: &BTreeMap<IndexName, TimeSeries>,
    options: &DisplayOptions,
) -> Result<BTreeMap<IndexName, PreparedSeries>, PrepareError> {
    options
        .indices()
        .iter()
        .map(|&index| {
            let series = raw
                .get(&index)
                .ok_or(PrepareError::MissingIndexData(index))?;
            let prepared = prepare_series(index, series, options)?;
            Ok((index, prepared))
        })
        .collect()
}

fn prepare_series(
    index: IndexName,
    series: &TimeSeries,
    options: &DisplayOptions,
) -> Result<PreparedSeries, PrepareError> {
    if series.is_empty() {
        return Err(PrepareError::EmptySeries(index));
    }

    let mut points = window(series.points(), options.period_days()).to_vec();

    // Must be captured before reversal changes positions
    let mut latest = latest_point(&points).ok_or(PrepareError::EmptySeries(index))?;

    if options.normalize {
        if let Some((min, max)) = normalize(&mut points) {
            latest.value = scale(latest.value, min, max);
        }
    }

    if options.reverse {
        reverse(&mut points);
    }

    debug!(
        "Prepared {}: {} of {} points, latest {} = {}",
        index,
        points.len(),
        series.len(),
        latest.date,
        latest.value
    );

    Ok(PreparedSeries::new(index, points, latest))
}

/// Most recent `days` entries of an oldest-first series.
/// Shorter series are returned whole.
pub fn window(points: &[DataPoint], days: usize) -> &[DataPoint] {
    &points[points.len().saturating_sub(days)..]
}

/// Point with the greatest date, independent of position
pub fn latest_point(points: &[DataPoint]) -> Option<DataPoint> {
    points.iter().copied().max_by_key(|p| p.date)
}

/// Smallest and largest value, or `None` for an empty slice
pub fn min_max(points: &[DataPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Min-max scale a value into [0, 1]. A flat range maps to 0.0.
pub fn scale(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.0
    } else {
        (value - min) / (max - min)
    }
}

/// Rescale every value of the slice into [0, 1] using its own min and max.
/// Returns the bounds that were used.
pub fn normalize(points: &mut [DataPoint]) -> Option<(f64, f64)> {
    let (min, max) = min_max(points)?;
    for point in points.iter_mut() {
        point.value = scale(point.value, min, max);
    }
    Some((min, max))
}

/// Put the newest point first
pub fn reverse(points: &mut [DataPoint]) {
    points.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| DataPoint::new(day(i as u32 + 1), v))
                .collect(),
        )
    }

    fn options(indices: &[IndexName], normalize: bool, reverse: bool) -> DisplayOptions {
        let indices: BTreeSet<IndexName> = indices.iter().copied().collect();
        DisplayOptions::new(indices, Period::Days30, normalize, reverse, true).unwrap()
    }

    fn raw_with(index: IndexName, s: TimeSeries) -> BTreeMap<IndexName, TimeSeries> {
        let mut raw = BTreeMap::new();
        raw.insert(index, s);
        raw
    }

    #[test]
    fn test_window_keeps_most_recent_points() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let windowed = window(s.points(), 3);
        let values: Vec<f64> = windowed.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_window_length_is_min_of_period_and_len() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        for days in 1..10 {
            assert_eq!(window(s.points(), days).len(), days.min(s.len()));
        }
    }

    #[test]
    fn test_latest_point_ignores_position() {
        let points = vec![
            DataPoint::new(day(3), 90.0),
            DataPoint::new(day(1), 100.0),
            DataPoint::new(day(2), 110.0),
        ];
        assert_eq!(latest_point(&points), Some(DataPoint::new(day(3), 90.0)));
        assert_eq!(latest_point(&[]), None);
    }

    #[test]
    fn test_normalize_bounds() {
        let mut points = series(&[5.0, 20.0, 12.5, 7.0]).points().to_vec();
        assert_eq!(normalize(&mut points), Some((5.0, 20.0)));

        assert!(points.iter().all(|p| (0.0..=1.0).contains(&p.value)));
        assert_eq!(points[1].value, 1.0);
        assert_eq!(points[0].value, 0.0);
    }

    #[test]
    fn test_normalize_flat_series_is_zero() {
        let mut points = series(&[100.0, 100.0, 100.0]).points().to_vec();
        normalize(&mut points);
        assert!(points.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_reverse_twice_restores_order() {
        let original = series(&[1.0, 2.0, 3.0, 4.0]).points().to_vec();
        let mut points = original.clone();
        reverse(&mut points);
        assert_eq!(points[0].date, day(4));
        reverse(&mut points);
        assert_eq!(points, original);
    }

    #[test]
    fn test_prepare_normalized_example() {
        let raw = raw_with(IndexName::Nifty, series(&[100.0, 110.0, 90.0]));
        let opts = options(&[IndexName::Nifty], true, false);

        let prepared = prepare(&raw, &opts).unwrap();
        let nifty = &prepared[&IndexName::Nifty];

        assert_eq!(
            nifty.points(),
            &[
                DataPoint::new(day(1), 0.5),
                DataPoint::new(day(2), 1.0),
                DataPoint::new(day(3), 0.0),
            ]
        );
        assert_eq!(nifty.latest_point(), DataPoint::new(day(3), 0.0));
    }

    #[test]
    fn test_prepare_reversed_example() {
        let raw = raw_with(IndexName::Nifty, series(&[100.0, 110.0, 90.0]));
        let opts = options(&[IndexName::Nifty], false, true);

        let prepared = prepare(&raw, &opts).unwrap();
        let nifty = &prepared[&IndexName::Nifty];

        assert_eq!(
            nifty.points(),
            &[
                DataPoint::new(day(3), 90.0),
                DataPoint::new(day(2), 110.0),
                DataPoint::new(day(1), 100.0),
            ]
        );
        assert_eq!(nifty.latest_point(), DataPoint::new(day(3), 90.0));
    }

    #[test]
    fn test_latest_point_same_with_or_without_reverse() {
        let raw = raw_with(IndexName::BankNifty, series(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0]));

        let forward = prepare(&raw, &options(&[IndexName::BankNifty], true, false)).unwrap();
        let backward = prepare(&raw, &options(&[IndexName::BankNifty], true, true)).unwrap();

        assert_eq!(
            forward[&IndexName::BankNifty].latest_point(),
            backward[&IndexName::BankNifty].latest_point()
        );
        assert_eq!(forward[&IndexName::BankNifty].latest_point().date, day(7));
    }

    #[test]
    fn test_prepare_applies_period_window() {
        let values: Vec<f64> = (0..40).map(|v| v as f64).collect();
        let s = TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64);
                    DataPoint::new(date, v)
                })
                .collect(),
        );
        let raw = raw_with(IndexName::Nifty, s);

        let prepared = prepare(&raw, &options(&[IndexName::Nifty], false, false)).unwrap();
        let nifty = &prepared[&IndexName::Nifty];

        assert_eq!(nifty.points().len(), 30);
        assert_eq!(nifty.points()[0].value, 10.0);
        assert_eq!(nifty.latest_point().value, 39.0);
    }

    #[test]
    fn test_indices_are_normalized_independently() {
        let mut raw = raw_with(IndexName::Nifty, series(&[10.0, 20.0]));
        raw.insert(IndexName::BankNifty, series(&[1000.0, 500.0, 2000.0]));

        let prepared = prepare(&raw, &options(&IndexName::ALL, true, false)).unwrap();

        assert_eq!(prepared[&IndexName::Nifty].latest_point().value, 1.0);
        assert_eq!(prepared[&IndexName::BankNifty].points()[1].value, 0.0);
        assert_eq!(prepared[&IndexName::BankNifty].points().len(), 3);
    }

    #[test]
    fn test_unrequested_indices_are_skipped() {
        let mut raw = raw_with(IndexName::Nifty, series(&[1.0]));
        raw.insert(IndexName::BankNifty, series(&[2.0]));

        let prepared = prepare(&raw, &options(&[IndexName::BankNifty], false, false)).unwrap();
        assert_eq!(prepared.len(), 1);
        assert!(prepared.contains_key(&IndexName::BankNifty));
    }

    #[test]
    fn test_missing_index_data() {
        let raw = raw_with(IndexName::Nifty, series(&[1.0, 2.0]));
        let result = prepare(&raw, &options(&[IndexName::BankNifty], false, false));
        assert_eq!(result, Err(PrepareError::MissingIndexData(IndexName::BankNifty)));
    }

    #[test]
    fn test_empty_series() {
        let raw = raw_with(IndexName::Nifty, TimeSeries::default());
        let result = prepare(&raw, &options(&[IndexName::Nifty], true, true));
        assert_eq!(result, Err(PrepareError::EmptySeries(IndexName::Nifty)));
        assert_eq!(
            PrepareError::MissingIndexData(IndexName::Nifty).to_string(),
            "No data available for NIFTY"
        );
    }
}
