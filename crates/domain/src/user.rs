use derive_more::{AsRef, Deref, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub email: Email,
    pub name: String,
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(u32);

impl From<u32> for UserID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, EmailError> {
        let trimmed_email = email.trim();

        if trimmed_email.is_empty() {
            return Err(EmailError::Empty);
        }

        match trimmed_email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains('@') =>
            {
                Ok(Email(trimmed_email.to_string()))
            }
            _ => Err(EmailError::Invalid),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("Email must not be empty")]
    Empty,
    #[error("Email address is invalid")]
    Invalid,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("alice@example.com", Ok(Email("alice@example.com".to_string())))]
    #[case(" bob@example.org ", Ok(Email("bob@example.org".to_string())))]
    #[case("", Err(EmailError::Empty))]
    #[case("alice", Err(EmailError::Invalid))]
    #[case("@example.com", Err(EmailError::Invalid))]
    #[case("alice@example", Err(EmailError::Invalid))]
    #[case("alice@.com", Err(EmailError::Invalid))]
    #[case("alice@example.com.", Err(EmailError::Invalid))]
    #[case("alice@ex@ample.com", Err(EmailError::Invalid))]
    fn test_email_new(#[case] email: &str, #[case] expected: Result<Email, EmailError>) {
        assert_eq!(Email::new(email), expected);
    }
}
