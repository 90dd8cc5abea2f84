use chrono::{Duration, NaiveDateTime};
use derive_more::Deref;

use crate::{
    CreateError, DeleteError, ExerciseID, Metrics, Progress, ReadError, UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn create_workout(
        &self,
        exercise_id: ExerciseID,
        date: Option<NaiveDateTime>,
        metrics: Metrics,
        notes: Option<String>,
    ) -> Result<Workout, CreateError>;
    async fn modify_workout(
        &self,
        id: WorkoutID,
        metrics: Option<Metrics>,
        notes: Option<String>,
    ) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    async fn get_progress(&self, exercise_id: ExerciseID) -> Result<Progress, ReadError>;

    #[must_use]
    fn validate_workout_notes(&self, notes: &str) -> Option<String> {
        let trimmed = notes.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    async fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn create_workout(
        &self,
        exercise_id: ExerciseID,
        date: Option<NaiveDateTime>,
        metrics: Metrics,
        notes: Option<String>,
    ) -> Result<Workout, CreateError>;
    async fn modify_workout(
        &self,
        id: WorkoutID,
        metrics: Option<Metrics>,
        notes: Option<String>,
    ) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    async fn read_progress(&self, exercise_id: ExerciseID) -> Result<Progress, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub exercise_id: ExerciseID,
    pub date: NaiveDateTime,
    pub metrics: Metrics,
    pub notes: Option<String>,
}

impl Workout {
    /// Whether the workout took place during the `days` days before `now`.
    #[must_use]
    pub fn is_within_days(&self, now: NaiveDateTime, days: i64) -> bool {
        self.date >= now - Duration::days(days) && self.date <= now
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(u32);

impl From<u32> for WorkoutID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Sort workouts by date, the most recent first.
pub fn sort_newest_first(workouts: &mut [Workout]) {
    workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_workouts: usize,
    pub available_exercises: usize,
    pub workouts_this_week: usize,
}

impl Summary {
    #[must_use]
    pub fn new(workouts: &[Workout], available_exercises: usize, now: NaiveDateTime) -> Self {
        Self {
            total_workouts: workouts.len(),
            available_exercises,
            workouts_this_week: workouts.iter().filter(|w| w.is_within_days(now, 7)).count(),
        }
    }
}
