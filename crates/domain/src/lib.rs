#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod interval;
mod metric;
mod name;
mod progress;
mod service;
mod session;
mod user;
mod workout;

pub use error::{
    CreateError, DeleteError, ReadError, StorageError, StorageFailure, UpdateError,
    ValidationError,
};
pub use exercise::{
    Exercise, ExerciseFilter, ExerciseID, ExerciseRepository, ExerciseService, MuscleGroup,
    Property, group_by_muscle_group,
};
pub use interval::{DefaultInterval, Interval, init_interval};
pub use metric::{
    ABSENT, Distance, Metric, MetricError, MetricSchema, MetricValue, Metrics, Reps, Sets, Time,
    Weight,
};
pub use name::{Name, NameError};
pub use progress::{Progress, ProgressPoint};
pub use service::Service;
pub use session::{
    Credentials, CredentialsError, Password, Registration, SessionRepository, SessionService,
};
pub use user::{Email, EmailError, User, UserID};
pub use workout::{
    Summary, Workout, WorkoutID, WorkoutRepository, WorkoutService, sort_newest_first,
};
