//! Workout table and edit dialog
//!
//! Records are labeled and formatted according to the current metric schema of their exercise.
//! Metrics the schema does not collect are neither displayed nor offered for editing.

use gymlog_domain::{
    ABSENT, Exercise, Metric, MetricSchema, Property, Workout, WorkoutID, WorkoutService,
    sort_newest_first,
};
use log::debug;

use crate::{
    ActionError,
    form::{FieldValueState, MetricField, MetricInputs},
};

pub const DATE_FORMAT: &str = "%b %d, %Y %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutRow {
    pub id: WorkoutID,
    pub exercise: String,
    pub muscle_group: &'static str,
    pub primary_label: &'static str,
    pub primary: String,
    pub secondary_label: &'static str,
    pub secondary: String,
    pub date: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutTable {
    exercises: Vec<Exercise>,
    workouts: Vec<Workout>,
    pub is_loading: bool,
    pub alert: Option<String>,
}

impl WorkoutTable {
    #[must_use]
    pub fn new(exercises: Vec<Exercise>, mut workouts: Vec<Workout>) -> Self {
        sort_newest_first(&mut workouts);
        Self {
            exercises,
            workouts,
            is_loading: false,
            alert: None,
        }
    }

    #[must_use]
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn set_exercises(&mut self, exercises: Vec<Exercise>) {
        self.exercises = exercises;
    }

    fn exercise(&self, workout: &Workout) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == workout.exercise_id)
    }

    #[must_use]
    pub fn rows(&self) -> Vec<WorkoutRow> {
        self.workouts
            .iter()
            .map(|workout| {
                let exercise = self.exercise(workout);
                let schema = exercise.map_or_else(MetricSchema::default, Exercise::metric_schema);
                WorkoutRow {
                    id: workout.id,
                    exercise: exercise.map_or_else(|| ABSENT.to_string(), |e| e.name.to_string()),
                    muscle_group: exercise.map_or(ABSENT, |e| e.muscle_group.name()),
                    primary_label: primary_label(schema),
                    primary: schema.format_primary(&workout.metrics),
                    secondary_label: secondary_label(schema),
                    secondary: schema.format_secondary(&workout.metrics),
                    date: workout.date.format(DATE_FORMAT).to_string(),
                    notes: workout
                        .notes
                        .clone()
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| ABSENT.to_string()),
                }
            })
            .collect()
    }

    /// Add a newly created workout at the top.
    pub fn insert(&mut self, workout: Workout) {
        self.workouts.insert(0, workout);
    }

    /// Replace a workout after it has been modified.
    pub fn update(&mut self, workout: Workout) {
        if let Some(w) = self.workouts.iter_mut().find(|w| w.id == workout.id) {
            *w = workout;
        }
        sort_newest_first(&mut self.workouts);
    }

    /// Delete a workout.
    ///
    /// The workout is removed from the table only once the deletion is confirmed. On failure the
    /// table is left unchanged and an alert is set.
    pub async fn delete(
        &mut self,
        id: WorkoutID,
        service: &impl WorkoutService,
    ) -> Result<(), ActionError> {
        self.alert = None;
        self.is_loading = true;
        let result = service.delete_workout(id).await;
        self.is_loading = false;
        match result {
            Ok(id) => {
                self.workouts.retain(|w| w.id != id);
                Ok(())
            }
            Err(err) => {
                let err = ActionError::from(err);
                if err != ActionError::Unauthorized {
                    self.alert = Some(format!("Failed to delete workout: {err}"));
                }
                Err(err)
            }
        }
    }

    /// Open the edit dialog of a workout.
    #[must_use]
    pub fn edit(&self, id: WorkoutID) -> Option<EditDialog> {
        let workout = self.workouts.iter().find(|w| w.id == id)?;
        let exercise = self.exercise(workout);
        Some(EditDialog::new(
            workout,
            exercise.map_or_else(|| ABSENT.to_string(), |e| e.name.to_string()),
            exercise.map_or_else(MetricSchema::default, Exercise::metric_schema),
        ))
    }
}

fn primary_label(schema: MetricSchema) -> &'static str {
    schema.primary().label()
}

fn secondary_label(schema: MetricSchema) -> &'static str {
    match schema {
        MetricSchema::Strength | MetricSchema::Functional => "Sets x Reps",
        MetricSchema::Abdomen | MetricSchema::Cardio => schema.secondary().label(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditDialog {
    workout_id: WorkoutID,
    pub exercise: String,
    metrics: MetricInputs,
    notes: String,
    orig_notes: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl EditDialog {
    fn new(workout: &Workout, exercise: String, schema: MetricSchema) -> Self {
        let notes = workout.notes.clone().unwrap_or_default();
        Self {
            workout_id: workout.id,
            exercise,
            metrics: MetricInputs::from_metrics(schema, &workout.metrics),
            orig_notes: notes.trim().to_string(),
            notes,
            is_loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn workout_id(&self) -> WorkoutID {
        self.workout_id
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

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.metrics.changed() || self.notes_changed()
    }

    fn notes_changed(&self) -> bool {
        self.notes.trim() != self.orig_notes
    }

    /// Validate and save the changes.
    ///
    /// Only the metrics active in the schema are sent. Notes are sent only if they were changed,
    /// an empty value removes them.
    pub async fn save(&mut self, service: &impl WorkoutService) -> Result<Workout, ActionError> {
        self.error = None;
        let Some(metrics) = self.metrics.validate() else {
            return Err(ActionError::Validation(
                "Check the highlighted fields".to_string(),
            ));
        };
        let notes = if self.notes_changed() {
            Some(self.notes.trim().to_string())
        } else {
            None
        };

        debug!("saving workout {}", *self.workout_id);
        self.is_loading = true;
        let result = service
            .modify_workout(self.workout_id, Some(metrics), notes)
            .await;
        self.is_loading = false;

        result.map_err(|err| {
            let err = ActionError::from(err);
            if err != ActionError::Unauthorized {
                self.error = Some(err.to_string());
            }
            err
        })
    }
}
