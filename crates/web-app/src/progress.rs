use gymlog_domain::{
    DefaultInterval, Exercise, Interval, MetricSchema, Progress, WorkoutService, init_interval,
};

use crate::{
    ActionError, Theme,
    chart::{self, PlotData},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

/// Progress of a single exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub exercise: Exercise,
    progress: Option<Progress>,
    pub interval: Interval,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ProgressView {
    #[must_use]
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            progress: None,
            interval: init_interval(&[], DefaultInterval::All),
            is_loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn schema(&self) -> MetricSchema {
        self.exercise.metric_schema()
    }

    pub async fn load(
        &mut self,
        service: &impl WorkoutService,
        default_interval: DefaultInterval,
    ) -> Result<(), ActionError> {
        self.is_loading = true;
        let result = service.get_progress(self.exercise.id).await;
        self.is_loading = false;
        match result {
            Ok(progress) => {
                self.interval = init_interval(&progress.dates(), default_interval);
                self.progress = Some(progress);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                let err = ActionError::from(err);
                if err != ActionError::Unauthorized {
                    self.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Whether progress has been loaded but there is nothing to show.
    #[must_use]
    pub fn has_no_data(&self) -> bool {
        self.progress.as_ref().is_some_and(Progress::is_empty)
    }

    /// Aggregates as calculated by the backend, formatted with the unit of the primary metric.
    #[must_use]
    pub fn stats(&self) -> Vec<Stat> {
        let Some(progress) = &self.progress else {
            return vec![];
        };
        let unit = self.schema().primary().unit();
        let format = |value: Option<f32>| match (value, unit) {
            (Some(value), Some(unit)) => format!("{} {unit}", round(value)),
            (Some(value), None) => round(value).to_string(),
            (None, _) => gymlog_domain::ABSENT.to_string(),
        };
        vec![
            Stat {
                label: "Max",
                value: format(progress.max_value),
            },
            Stat {
                label: "Average",
                value: format(progress.avg_value),
            },
            Stat {
                label: "Last",
                value: format(progress.last_value),
            },
            Stat {
                label: "Sessions",
                value: progress.total_sessions.to_string(),
            },
        ]
    }

    #[must_use]
    pub fn plot_data(&self) -> Vec<PlotData> {
        self.progress
            .as_ref()
            .map(|progress| chart::progress_plot_data(progress, self.schema(), &self.interval))
            .unwrap_or_default()
    }

    pub fn chart(&self, theme: &Theme) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let Some(progress) = &self.progress else {
            return Ok(None);
        };
        chart::plot_progress(progress, self.schema(), &self.interval, theme)
    }
}

fn round(value: f32) -> f32 {
    (value * 10.).round() / 10.
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use pretty_assertions::assert_eq;

    use crate::tests::{BENCH_PRESS, Call, Failure, FakeService, RUNNING, exercises};

    use super::*;

    fn view(id: u32) -> ProgressView {
        ProgressView::new(
            exercises()
                .into_iter()
                .find(|e| *e.id == id)
                .unwrap(),
        )
    }

    fn stats(view: &ProgressView) -> Vec<(&'static str, String)> {
        view.stats()
            .into_iter()
            .map(|s| (s.label, s.value))
            .collect()
    }

    #[tokio::test]
    async fn test_load() {
        let service = FakeService::new();
        let mut view = view(BENCH_PRESS);
        assert_eq!(view.stats(), vec![]);
        assert!(!view.has_no_data());

        view.load(&service, DefaultInterval::All).await.unwrap();

        assert_eq!(
            stats(&view),
            vec![
                ("Max", "62.5 kg".to_string()),
                ("Average", "61.3 kg".to_string()),
                ("Last", "62.5 kg".to_string()),
                ("Sessions", "2".to_string()),
            ]
        );
        assert_eq!(view.interval.last, Local::now().date_naive());
        assert_eq!(view.plot_data().len(), 2);
        assert_eq!(
            service.calls(),
            vec![Call::GetProgress(BENCH_PRESS.into())]
        );
    }

    #[tokio::test]
    async fn test_load_without_sessions() {
        let service = FakeService::new();
        *service.progress.borrow_mut() = Progress::default();
        let mut view = view(RUNNING);

        view.load(&service, DefaultInterval::_3M).await.unwrap();

        assert!(view.has_no_data());
        assert_eq!(
            stats(&view),
            vec![
                ("Max", "-".to_string()),
                ("Average", "-".to_string()),
                ("Last", "-".to_string()),
                ("Sessions", "0".to_string()),
            ]
        );
        assert_eq!(view.plot_data(), vec![]);
        assert_eq!(view.chart(&Theme::Light).unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_failure() {
        let service = FakeService::failing(Failure::Rejected);
        let mut view = view(BENCH_PRESS);

        assert_eq!(
            view.load(&service, DefaultInterval::All).await,
            Err(ActionError::Request("500 Internal Server Error".to_string()))
        );
        assert_eq!(view.error.as_deref(), Some("500 Internal Server Error"));
        assert_eq!(view.stats(), vec![]);
    }
}
