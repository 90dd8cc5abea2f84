use chrono::NaiveDateTime;
use futures_util::future::join;
use gymlog_domain::{Exercise, ExerciseID, ExerciseService, Summary, Workout, WorkoutService};

use crate::{ActionError, workout_form::WorkoutForm, workouts::WorkoutTable};

/// Overview of all exercises and workouts of the current user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    exercises: Vec<Exercise>,
    pub table: WorkoutTable,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Dashboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load exercises and workouts concurrently.
    ///
    /// The previous state is kept unless both requests succeed.
    pub async fn load<S: ExerciseService + WorkoutService>(
        &mut self,
        service: &S,
    ) -> Result<(), ActionError> {
        self.is_loading = true;
        let (exercises, workouts) = join(service.get_exercises(), service.get_workouts()).await;
        self.is_loading = false;
        match exercises.and_then(|e| workouts.map(|w| (e, w))) {
            Ok((exercises, workouts)) => {
                self.table = WorkoutTable::new(exercises.clone(), workouts);
                self.exercises = exercises;
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

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn summary(&self, now: NaiveDateTime) -> Summary {
        Summary::new(self.table.workouts(), self.exercises.len(), now)
    }

    /// Entry form for a new workout, optionally with an exercise already selected.
    #[must_use]
    pub fn workout_form(&self, preselected: Option<ExerciseID>) -> WorkoutForm {
        WorkoutForm::new(self.exercises.clone(), preselected)
    }

    /// Show a workout once it has been created.
    pub fn add_workout(&mut self, workout: Workout) {
        self.table.insert(workout);
    }

    /// Make a newly created exercise available.
    pub fn add_exercise(&mut self, exercise: Exercise) {
        self.exercises.push(exercise);
        self.table.set_exercises(self.exercises.clone());
    }
}
