use std::cell::RefCell;

use chrono::{NaiveDate, NaiveDateTime};
use gymlog_domain::{
    CreateError, Credentials, DeleteError, Distance, Email, Exercise, ExerciseID, ExerciseService,
    Metrics, MuscleGroup, Name, Progress, ProgressPoint, ReadError, Registration, Reps,
    SessionService, Sets, StorageError, Time, UpdateError, User, Weight, Workout, WorkoutID,
    WorkoutService,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Failure {
    NoConnection,
    NoSession,
    Rejected,
}

impl Failure {
    fn storage_error(self) -> StorageError {
        match self {
            Failure::NoConnection => StorageError::NoConnection,
            Failure::NoSession => StorageError::NoSession,
            Failure::Rejected => StorageError::Other("500 Internal Server Error".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RequestSession(String),
    GetSession,
    DeleteSession,
    Register(String),
    GetExercises,
    CreateExercise(String),
    GetWorkouts,
    CreateWorkout(ExerciseID, Metrics, Option<String>),
    ModifyWorkout(WorkoutID, Option<Metrics>, Option<String>),
    DeleteWorkout(WorkoutID),
    GetProgress(ExerciseID),
}

/// In-memory implementation of the domain services.
pub struct FakeService {
    pub user: RefCell<Option<User>>,
    pub exercises: RefCell<Vec<Exercise>>,
    pub workouts: RefCell<Vec<Workout>>,
    pub progress: RefCell<Progress>,
    pub failure: RefCell<Option<Failure>>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            user: RefCell::new(None),
            exercises: RefCell::new(exercises()),
            workouts: RefCell::new(workouts()),
            progress: RefCell::new(progress()),
            failure: RefCell::new(None),
            calls: RefCell::new(vec![]),
        }
    }

    pub fn failing(failure: Failure) -> Self {
        let service = Self::new();
        *service.failure.borrow_mut() = Some(failure);
        service
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn call(&self, call: Call) -> Result<(), StorageError> {
        self.calls.borrow_mut().push(call);
        match *self.failure.borrow() {
            Some(failure) => Err(failure.storage_error()),
            None => Ok(()),
        }
    }
}

impl SessionService for FakeService {
    async fn request_session(&self, credentials: Credentials) -> Result<User, ReadError> {
        self.call(Call::RequestSession(credentials.email.to_string()))?;
        if credentials.password.expose() != "secret" {
            return Err(ReadError::Other("Incorrect email or password".into()));
        }
        let user = User {
            id: 1.into(),
            email: credentials.email,
            name: "Alice".to_string(),
        };
        *self.user.borrow_mut() = Some(user.clone());
        Ok(user)
    }

    async fn get_session(&self) -> Result<User, ReadError> {
        self.call(Call::GetSession)?;
        self.user
            .borrow()
            .clone()
            .ok_or(ReadError::Storage(StorageError::NoSession))
    }

    async fn delete_session(&self) -> Result<(), DeleteError> {
        self.call(Call::DeleteSession)?;
        *self.user.borrow_mut() = None;
        Ok(())
    }

    async fn register(&self, registration: Registration) -> Result<User, CreateError> {
        self.call(Call::Register(registration.credentials.email.to_string()))?;
        if registration.credentials.email.as_ref() == "taken@example.com" {
            return Err(CreateError::Conflict);
        }
        Ok(User {
            id: 2.into(),
            email: registration.credentials.email,
            name: registration.name,
        })
    }
}

impl ExerciseService for FakeService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        self.call(Call::GetExercises)?;
        Ok(self.exercises.borrow().clone())
    }

    async fn create_exercise(
        &self,
        name: Name,
        muscle_group: MuscleGroup,
        description: Option<String>,
    ) -> Result<Exercise, CreateError> {
        self.call(Call::CreateExercise(name.to_string()))?;
        #[allow(clippy::cast_possible_truncation)]
        let exercise = Exercise {
            id: (self.exercises.borrow().len() as u32 + 1).into(),
            name,
            muscle_group,
            description,
            owner: Some(1.into()),
        };
        self.exercises.borrow_mut().push(exercise.clone());
        Ok(exercise)
    }
}

impl WorkoutService for FakeService {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        self.call(Call::GetWorkouts)?;
        Ok(self.workouts.borrow().clone())
    }

    async fn create_workout(
        &self,
        exercise_id: ExerciseID,
        date: Option<NaiveDateTime>,
        metrics: Metrics,
        notes: Option<String>,
    ) -> Result<Workout, CreateError> {
        self.call(Call::CreateWorkout(exercise_id, metrics, notes.clone()))?;
        #[allow(clippy::cast_possible_truncation)]
        let workout = Workout {
            id: (self.workouts.borrow().len() as u32 + 1).into(),
            exercise_id,
            date: date.unwrap_or(at(20, 9)),
            metrics,
            notes,
        };
        self.workouts.borrow_mut().push(workout.clone());
        Ok(workout)
    }

    async fn modify_workout(
        &self,
        id: WorkoutID,
        metrics: Option<Metrics>,
        notes: Option<String>,
    ) -> Result<Workout, UpdateError> {
        self.call(Call::ModifyWorkout(id, metrics, notes.clone()))?;
        let mut workouts = self.workouts.borrow_mut();
        let workout = workouts
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(UpdateError::Other("Workout not found".into()))?;
        if let Some(metrics) = metrics {
            workout.metrics = metrics;
        }
        if let Some(notes) = notes {
            workout.notes = if notes.is_empty() { None } else { Some(notes) };
        }
        Ok(workout.clone())
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        self.call(Call::DeleteWorkout(id))?;
        self.workouts.borrow_mut().retain(|w| w.id != id);
        Ok(id)
    }

    async fn get_progress(&self, exercise_id: ExerciseID) -> Result<Progress, ReadError> {
        self.call(Call::GetProgress(exercise_id))?;
        Ok(self.progress.borrow().clone())
    }
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn user() -> User {
    User {
        id: 1.into(),
        email: Email::new("alice@example.com").unwrap(),
        name: "Alice".to_string(),
    }
}

pub fn exercise(id: u32, name: &str, muscle_group: MuscleGroup) -> Exercise {
    Exercise {
        id: id.into(),
        name: Name::new(name).unwrap(),
        muscle_group,
        description: None,
        owner: None,
    }
}

pub const BENCH_PRESS: u32 = 1;
pub const RUNNING: u32 = 2;
pub const CRUNCHES: u32 = 3;
pub const KETTLEBELL_SWING: u32 = 4;

pub fn exercises() -> Vec<Exercise> {
    vec![
        exercise(BENCH_PRESS, "Bench Press", MuscleGroup::Chest),
        exercise(RUNNING, "Running", MuscleGroup::Cardio),
        exercise(CRUNCHES, "Crunches", MuscleGroup::Abdomen),
        exercise(KETTLEBELL_SWING, "Kettlebell Swing", MuscleGroup::Functional),
    ]
}

pub fn workouts() -> Vec<Workout> {
    vec![
        Workout {
            id: 1.into(),
            exercise_id: BENCH_PRESS.into(),
            date: at(1, 18),
            metrics: Metrics {
                weight: Some(Weight::new(60.0).unwrap()),
                reps: Some(Reps::new(8).unwrap()),
                sets: Some(Sets::new(3).unwrap()),
                ..Metrics::default()
            },
            notes: None,
        },
        Workout {
            id: 2.into(),
            exercise_id: RUNNING.into(),
            date: at(14, 7),
            metrics: Metrics {
                time: Some(Time::new(30.0).unwrap()),
                distance: Some(Distance::new(5.0).unwrap()),
                ..Metrics::default()
            },
            notes: Some("Easy pace".to_string()),
        },
        Workout {
            id: 3.into(),
            exercise_id: KETTLEBELL_SWING.into(),
            date: at(10, 12),
            metrics: Metrics {
                weight: Some(Weight::new(20.0).unwrap()),
                reps: Some(Reps::new(15).unwrap()),
                sets: Some(Sets::new(3).unwrap()),
                ..Metrics::default()
            },
            notes: None,
        },
    ]
}

pub fn progress() -> Progress {
    Progress {
        max_value: Some(62.5),
        avg_value: Some(61.25),
        last_value: Some(62.5),
        total_sessions: 2,
        points: vec![
            ProgressPoint {
                date: at(1, 18),
                metrics: Metrics {
                    weight: Some(Weight::new(60.0).unwrap()),
                    reps: Some(Reps::new(8).unwrap()),
                    sets: Some(Sets::new(3).unwrap()),
                    ..Metrics::default()
                },
            },
            ProgressPoint {
                date: at(8, 18),
                metrics: Metrics {
                    weight: Some(Weight::new(62.5).unwrap()),
                    reps: Some(Reps::new(6).unwrap()),
                    sets: Some(Sets::new(3).unwrap()),
                    ..Metrics::default()
                },
            },
        ],
    }
}
