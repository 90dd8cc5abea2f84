//! Workout entry form
//!
//! The fields shown follow the metric schema of the selected exercise. Selecting another exercise
//! switches the schema, and inputs of metrics the new schema does not collect are discarded so they
//! can never be submitted.

use gymlog_domain::{
    Exercise, ExerciseFilter, ExerciseID, Metric, MetricSchema, MuscleGroup, Workout,
    WorkoutService, group_by_muscle_group,
};
use log::debug;

use crate::{
    ActionError,
    form::{MetricField, MetricInputs},
};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutForm {
    exercises: Vec<Exercise>,
    exercise_id: Option<ExerciseID>,
    metrics: MetricInputs,
    notes: String,
    pub filter: ExerciseFilter,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl WorkoutForm {
    /// Create a form, optionally with an exercise already selected.
    #[must_use]
    pub fn new(exercises: Vec<Exercise>, preselected: Option<ExerciseID>) -> Self {
        let mut form = Self {
            exercises,
            exercise_id: None,
            metrics: MetricInputs::new(MetricSchema::default()),
            notes: String::new(),
            filter: ExerciseFilter::default(),
            is_loading: false,
            error: None,
        };
        if let Some(id) = preselected {
            form.select_exercise(id);
        }
        form
    }

    /// Exercises matching the filter, grouped by muscle group.
    #[must_use]
    pub fn exercise_groups(&self) -> Vec<(MuscleGroup, Vec<&Exercise>)> {
        group_by_muscle_group(self.filter.exercises(self.exercises.iter()).into_iter())
    }

    /// Select an exercise. Unknown IDs clear the selection.
    pub fn select_exercise(&mut self, id: ExerciseID) {
        let exercise = self.exercises.iter().find(|e| e.id == id);
        self.exercise_id = exercise.map(|e| e.id);
        let schema = exercise.map_or_else(MetricSchema::default, Exercise::metric_schema);
        if schema != self.metrics.schema() {
            debug!("switching metric schema to {schema:?}");
            self.metrics.set_schema(schema);
        }
        self.error = None;
    }

    #[must_use]
    pub fn exercise(&self) -> Option<&Exercise> {
        self.exercise_id
            .and_then(|id| self.exercises.iter().find(|e| e.id == id))
    }

    #[must_use]
    pub fn schema(&self) -> MetricSchema {
        self.metrics.schema()
    }

    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        self.exercise().and_then(|_| self.schema().hint())
    }

    #[must_use]
    pub fn fields(&self) -> Vec<MetricField> {
        self.metrics.fields()
    }

    pub fn set_input(&mut self, metric: Metric, input: &str) {
        self.metrics.set(metric, input);
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    /// Validate and submit the workout.
    ///
    /// Nothing is sent if no exercise is selected or any active metric is invalid. The inputs are
    /// cleared only after the workout has been created.
    pub async fn submit(&mut self, service: &impl WorkoutService) -> Result<Workout, ActionError> {
        self.error = None;
        let Some(exercise_id) = self.exercise_id else {
            return Err(self.fail(ActionError::Validation(
                "Select an exercise".to_string(),
            )));
        };
        let Some(metrics) = self.metrics.validate() else {
            return Err(ActionError::Validation(
                "Check the highlighted fields".to_string(),
            ));
        };
        let notes = service.validate_workout_notes(&self.notes);

        self.is_loading = true;
        let result = service
            .create_workout(exercise_id, None, metrics, notes)
            .await;
        self.is_loading = false;

        match result {
            Ok(workout) => {
                self.metrics.clear();
                self.notes.clear();
                Ok(workout)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    fn fail(&mut self, err: ActionError) -> ActionError {
        if err != ActionError::Unauthorized {
            self.error = Some(err.to_string());
        }
        err
    }
}
