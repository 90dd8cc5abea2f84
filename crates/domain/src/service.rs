use chrono::NaiveDateTime;
use log::{debug, error};

use crate::{
    CreateError, Credentials, DeleteError, Exercise, ExerciseID, ExerciseRepository,
    ExerciseService, Metrics, MuscleGroup, Name, Progress, ReadError, Registration,
    SessionRepository, SessionService, UpdateError, User, Workout, WorkoutID, WorkoutRepository,
    WorkoutService,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn request_session(&self, credentials: Credentials) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.request_session(credentials),
            ReadError,
            "request",
            "session"
        )
    }

    async fn get_session(&self) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.initialize_session(),
            ReadError,
            "get",
            "session"
        )
    }

    async fn delete_session(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_session(),
            DeleteError,
            "delete",
            "session"
        )
    }

    async fn register(&self, registration: Registration) -> Result<User, CreateError> {
        log_on_error!(
            self.repository.register_user(registration),
            CreateError,
            "register",
            "user"
        )
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn create_exercise(
        &self,
        name: Name,
        muscle_group: MuscleGroup,
        description: Option<String>,
    ) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository
                .create_exercise(name, muscle_group, description),
            CreateError,
            "create",
            "exercise"
        )
    }
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(),
            ReadError,
            "get",
            "workouts"
        )
    }

    async fn create_workout(
        &self,
        exercise_id: ExerciseID,
        date: Option<NaiveDateTime>,
        metrics: Metrics,
        notes: Option<String>,
    ) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository
                .create_workout(exercise_id, date, metrics, notes),
            CreateError,
            "create",
            "workout"
        )
    }

    async fn modify_workout(
        &self,
        id: WorkoutID,
        metrics: Option<Metrics>,
        notes: Option<String>,
    ) -> Result<Workout, UpdateError> {
        log_on_error!(
            self.repository.modify_workout(id, metrics, notes),
            UpdateError,
            "modify",
            "workout"
        )
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }

    async fn get_progress(&self, exercise_id: ExerciseID) -> Result<Progress, ReadError> {
        log_on_error!(
            self.repository.read_progress(exercise_id),
            ReadError,
            "get",
            "progress"
        )
    }
}
