//! Time series models

use chrono::NaiveDate;

use super::index::IndexName;

/// A single closing value on a calendar date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl DataPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Daily values for one index, oldest first with unique dates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<DataPoint>,
}

impl TimeSeries {
    /// Build a series from points in any order.
    ///
    /// Points are sorted by date; when a date repeats, the value that came
    /// last in the input wins.
    pub fn from_points(mut points: Vec<DataPoint>) -> Self {
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<DataPoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Newest point of the series
    pub fn last(&self) -> Option<&DataPoint> {
        self.points.last()
    }
}

/// Output of one preparation pass for a single index.
///
/// `points` is in final display order (newest first when reversed).
/// `latest_point` is always the point with the maximum date, carrying the
/// same scaling as `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    index: IndexName,
    points: Vec<DataPoint>,
    latest_point: DataPoint,
}

impl PreparedSeries {
    pub(crate) fn new(index: IndexName, points: Vec<DataPoint>, latest_point: DataPoint) -> Self {
        Self {
            index,
            points,
            latest_point,
        }
    }

    pub fn index(&self) -> IndexName {
        self.index
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn latest_point(&self) -> DataPoint {
        self.latest_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_from_points_sorts_by_date() {
        let series = TimeSeries::from_points(vec![
            DataPoint::new(day(3), 3.0),
            DataPoint::new(day(1), 1.0),
            DataPoint::new(day(2), 2.0),
        ]);

        let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(series.last().unwrap().value, 3.0);
    }

    #[test]
    fn test_from_points_keeps_last_duplicate() {
        let series = TimeSeries::from_points(vec![
            DataPoint::new(day(1), 1.0),
            DataPoint::new(day(2), 2.0),
            DataPoint::new(day(2), 2.5),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[1], DataPoint::new(day(2), 2.5));
    }

    #[test]
    fn test_empty_series() {
        let series = TimeSeries::from_points(Vec::new());
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }
}
