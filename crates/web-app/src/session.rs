//! Session context
//!
//! Every screen reads the current user through `SessionContext::guard`. The context is populated
//! on login or when a stored session is restored, and cleared on logout or as soon as any request
//! is rejected because the session has expired.

use gymlog_domain::{self as domain, Credentials, Registration, SessionService, User};
use log::{debug, info};

use crate::ActionError;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unknown,
    Active(User),
    LoggedOut,
}

#[derive(Debug, Default)]
pub struct SessionContext {
    state: SessionState,
    pub is_loading: bool,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The current user, if a session is active.
    pub fn guard(&self) -> Result<&User, ActionError> {
        match &self.state {
            SessionState::Active(user) => Ok(user),
            SessionState::Unknown | SessionState::LoggedOut => Err(ActionError::Unauthorized),
        }
    }

    /// Restore a previously requested session.
    ///
    /// A missing or expired session is not an error, the context is just logged out.
    pub async fn restore(&mut self, service: &impl SessionService) -> Result<(), ActionError> {
        self.is_loading = true;
        let result = service.get_session().await;
        self.is_loading = false;
        match result {
            Ok(user) => {
                self.state = SessionState::Active(user);
                Ok(())
            }
            Err(domain::ReadError::Storage(domain::StorageError::NoSession)) => {
                debug!("no stored session");
                self.state = SessionState::LoggedOut;
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::LoggedOut;
                Err(err.into())
            }
        }
    }

    pub async fn log_in(
        &mut self,
        service: &impl SessionService,
        email: &str,
        password: &str,
    ) -> Result<&User, ActionError> {
        let credentials = Credentials::new(email, password)
            .map_err(|err| ActionError::Validation(err.to_string()))?;
        self.is_loading = true;
        let result = service.request_session(credentials).await;
        self.is_loading = false;
        let user = result?;
        info!("logged in as {}", user.email);
        self.state = SessionState::Active(user);
        self.guard()
    }

    /// Register a new user and log in with the same credentials.
    pub async fn register(
        &mut self,
        service: &impl SessionService,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<&User, ActionError> {
        let registration = Registration::new(email, password, name)
            .map_err(|err| ActionError::Validation(err.to_string()))?;
        self.is_loading = true;
        let result = service.register(registration).await;
        self.is_loading = false;
        match result {
            Ok(_) => self.log_in(service, email, password).await,
            Err(domain::CreateError::Conflict) => Err(ActionError::Request(
                "Email is already registered".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn log_out(&mut self, service: &impl SessionService) -> Result<(), ActionError> {
        let result = service.delete_session().await;
        self.state = SessionState::LoggedOut;
        result.map_err(ActionError::from)
    }

    /// End the session after a request was rejected as unauthorized.
    pub fn expire(&mut self) {
        if matches!(self.state, SessionState::Active(_)) {
            info!("session expired");
        }
        self.state = SessionState::LoggedOut;
    }

    /// Pass through the result of an action, expiring the session if the action was unauthorized.
    pub fn check<T>(&mut self, result: Result<T, ActionError>) -> Result<T, ActionError> {
        if let Err(ActionError::Unauthorized) = result {
            self.expire();
        }
        result
    }
}
