#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::fmt::Display;

use gymlog_domain::{self as domain, StorageFailure};

pub mod chart;
pub mod dashboard;
pub mod exercise_form;
pub mod form;
pub mod log;
pub mod progress;
pub mod service;
pub mod session;
pub mod settings;
pub mod workout_form;
pub mod workouts;

#[cfg(test)]
mod tests;

pub use settings::{Settings, SettingsRepository, SettingsService, Theme};

/// Outcome of a failed user action.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The input was rejected locally and nothing was sent.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Request(String),
    /// The session is missing or has expired, the user has to log in again.
    #[error("Session expired")]
    Unauthorized,
}

impl ActionError {
    fn from_failure<E: StorageFailure + Display>(err: &E) -> Self {
        if err.is_unauthorized() {
            return ActionError::Unauthorized;
        }
        match err.storage_error() {
            Some(domain::StorageError::NoConnection) => {
                ActionError::Request("No connection to server".to_string())
            }
            _ => ActionError::Request(err.to_string()),
        }
    }
}

impl From<domain::ReadError> for ActionError {
    fn from(value: domain::ReadError) -> Self {
        match value {
            domain::ReadError::NotFound => ActionError::Request("Not found".to_string()),
            _ => ActionError::from_failure(&value),
        }
    }
}

impl From<domain::CreateError> for ActionError {
    fn from(value: domain::CreateError) -> Self {
        match value {
            domain::CreateError::Conflict => ActionError::Request("Already exists".to_string()),
            _ => ActionError::from_failure(&value),
        }
    }
}

impl From<domain::UpdateError> for ActionError {
    fn from(value: domain::UpdateError) -> Self {
        match value {
            domain::UpdateError::Conflict => ActionError::Request("Already exists".to_string()),
            _ => ActionError::from_failure(&value),
        }
    }
}

impl From<domain::DeleteError> for ActionError {
    fn from(value: domain::DeleteError) -> Self {
        ActionError::from_failure(&value)
    }
}

impl From<domain::ValidationError> for ActionError {
    fn from(value: domain::ValidationError) -> Self {
        ActionError::Validation(value.to_string())
    }
}

#[cfg(test)]
mod action_error_tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        domain::ReadError::Storage(domain::StorageError::NoSession).into(),
        ActionError::Unauthorized
    )]
    #[case(
        domain::ReadError::Storage(domain::StorageError::NoConnection).into(),
        ActionError::Request("No connection to server".to_string())
    )]
    #[case(
        domain::CreateError::Conflict.into(),
        ActionError::Request("Already exists".to_string())
    )]
    #[case(
        domain::DeleteError::Other("404 Not Found".into()).into(),
        ActionError::Request("404 Not Found".to_string())
    )]
    #[case(
        domain::UpdateError::Storage(domain::StorageError::NoSession).into(),
        ActionError::Unauthorized
    )]
    #[case(
        domain::ValidationError::Conflict("name".to_string()).into(),
        ActionError::Validation("name already exists".to_string())
    )]
    fn test_action_error_from(#[case] error: ActionError, #[case] expected: ActionError) {
        assert_eq!(error, expected);
    }
}
