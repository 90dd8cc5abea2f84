use std::fmt;

use crate::{CreateError, DeleteError, Email, EmailError, ReadError, User};

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn request_session(&self, credentials: Credentials) -> Result<User, ReadError>;
    async fn get_session(&self) -> Result<User, ReadError>;
    async fn delete_session(&self) -> Result<(), DeleteError>;
    async fn register(&self, registration: Registration) -> Result<User, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn request_session(&self, credentials: Credentials) -> Result<User, ReadError>;
    async fn initialize_session(&self) -> Result<User, ReadError>;
    async fn delete_session(&self) -> Result<(), DeleteError>;
    async fn register_user(&self, registration: Registration) -> Result<User, CreateError>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: &str) -> Result<Self, CredentialsError> {
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self(password.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub credentials: Credentials,
    pub name: String,
}

impl Registration {
    pub fn new(email: &str, password: &str, name: &str) -> Result<Self, CredentialsError> {
        let credentials = Credentials::new(email, password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsError::EmptyName);
        }
        Ok(Self {
            credentials,
            name: name.to_string(),
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CredentialsError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("Password must not be empty")]
    EmptyPassword,
    #[error("Name must not be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_password_debug_hides_secret() {
        assert_eq!(
            format!("{:?}", Password::new("secret").unwrap()),
            "Password(***)"
        );
    }

    #[rstest]
    #[case("alice@example.com", "secret", None)]
    #[case("", "secret", Some(CredentialsError::Email(EmailError::Empty)))]
    #[case("alice", "secret", Some(CredentialsError::Email(EmailError::Invalid)))]
    #[case("alice@example.com", "", Some(CredentialsError::EmptyPassword))]
    fn test_credentials_new(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: Option<CredentialsError>,
    ) {
        assert_eq!(Credentials::new(email, password).err(), expected);
    }

    #[test]
    fn test_credentials_keep_password_verbatim() {
        let credentials = Credentials::new(" alice@example.com ", " pass word ").unwrap();
        assert_eq!(credentials.email.as_ref(), "alice@example.com");
        assert_eq!(credentials.password.expose(), " pass word ");
    }

    #[rstest]
    #[case("Alice", Ok("Alice"))]
    #[case("  Alice  ", Ok("Alice"))]
    #[case("  ", Err(CredentialsError::EmptyName))]
    fn test_registration_new(#[case] name: &str, #[case] expected: Result<&str, CredentialsError>) {
        assert_eq!(
            Registration::new("alice@example.com", "secret", name).map(|r| r.name),
            expected.map(str::to_string)
        );
    }
}
