use chrono::{NaiveDate, NaiveDateTime};

use crate::{Interval, Metric, Metrics};

/// Aggregated progress of a single exercise as calculated by the backend.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Progress {
    pub max_value: Option<f32>,
    pub avg_value: Option<f32>,
    pub last_value: Option<f32>,
    pub total_sessions: u32,
    pub points: Vec<ProgressPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDateTime,
    pub metrics: Metrics,
}

impl Progress {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date.date()).collect()
    }

    /// Values of a metric in chronological order, restricted to the given interval.
    ///
    /// Points without a value for the metric are skipped.
    #[must_use]
    pub fn series(&self, metric: Metric, interval: &Interval) -> Vec<(NaiveDate, f32)> {
        let mut series = self
            .points
            .iter()
            .filter(|p| interval.contains(p.date.date()))
            .filter_map(|p| p.metrics.value(metric).map(|v| (p.date.date(), v)))
            .collect::<Vec<_>>();
        series.sort_by_key(|(date, _)| *date);
        series
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Time, Weight};

    use super::*;

    fn point(day: u32, metrics: Metrics) -> ProgressPoint {
        ProgressPoint {
            date: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
            metrics,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn test_progress_series() {
        let progress = Progress {
            total_sessions: 4,
            points: vec![
                point(
                    12,
                    Metrics {
                        weight: Some(Weight::new(62.5).unwrap()),
                        ..Metrics::default()
                    },
                ),
                point(
                    3,
                    Metrics {
                        weight: Some(Weight::new(60.0).unwrap()),
                        ..Metrics::default()
                    },
                ),
                point(
                    7,
                    Metrics {
                        time: Some(Time::new(12.0).unwrap()),
                        ..Metrics::default()
                    },
                ),
                point(
                    20,
                    Metrics {
                        weight: Some(Weight::new(65.0).unwrap()),
                        ..Metrics::default()
                    },
                ),
            ],
            ..Progress::default()
        };

        assert!(!progress.is_empty());
        assert_eq!(
            progress.series(Metric::Weight, &(date(1)..=date(15)).into()),
            vec![(date(3), 60.0), (date(12), 62.5)]
        );
        assert_eq!(
            progress.series(Metric::Time, &(date(1)..=date(31)).into()),
            vec![(date(7), 12.0)]
        );
        assert_eq!(
            progress.series(Metric::Distance, &(date(1)..=date(31)).into()),
            vec![]
        );
        assert_eq!(progress.dates().len(), 4);
    }

    #[test]
    fn test_progress_empty() {
        assert!(Progress::default().is_empty());
    }
}
