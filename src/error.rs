use std::time::Duration;
use thiserror::Error;

/// Failure of a call to one of the remote collaborators
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Classified reason an authentication call did not succeed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("user already exists")]
    Duplicate,

    #[error("invalid data")]
    Invalid,

    #[error("wrong credentials")]
    Forbidden,

    #[error("user not found")]
    UnknownUser,

    #[error("auth service unavailable (status {0:?})")]
    Unavailable(Option<u16>),
}

impl AuthFailure {
    pub fn from_status(status: u16) -> Self {
        match status {
            409 => AuthFailure::Duplicate,
            400 => AuthFailure::Invalid,
            403 => AuthFailure::Forbidden,
            404 => AuthFailure::UnknownUser,
            other => AuthFailure::Unavailable(Some(other)),
        }
    }

    pub fn from_api_error(error: &ApiError) -> Self {
        match error.status() {
            Some(status) => Self::from_status(status),
            None => AuthFailure::Unavailable(None),
        }
    }

    /// Message shown after a failed login
    pub fn login_message(&self) -> &'static str {
        match self {
            AuthFailure::Forbidden => "Wrong username or password",
            AuthFailure::UnknownUser => "No account exists for this username",
            AuthFailure::Invalid => "Please check the entered credentials",
            AuthFailure::Duplicate | AuthFailure::Unavailable(_) => GENERIC_LOGIN_MESSAGE,
        }
    }

    /// Message shown after a failed registration
    pub fn register_message(&self) -> &'static str {
        match self {
            AuthFailure::Duplicate => "A user with this username or email already exists",
            AuthFailure::Invalid => "The registration data is invalid",
            AuthFailure::Forbidden | AuthFailure::UnknownUser | AuthFailure::Unavailable(_) => {
                GENERIC_REGISTER_MESSAGE
            }
        }
    }
}

const GENERIC_LOGIN_MESSAGE: &str = "An error occurred while signing in";
const GENERIC_REGISTER_MESSAGE: &str = "An error occurred during registration";

/// Failure reading or writing persisted session slots
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(AuthFailure::from_status(409), AuthFailure::Duplicate);
        assert_eq!(AuthFailure::from_status(400), AuthFailure::Invalid);
        assert_eq!(AuthFailure::from_status(403), AuthFailure::Forbidden);
        assert_eq!(AuthFailure::from_status(404), AuthFailure::UnknownUser);
        assert_eq!(
            AuthFailure::from_status(502),
            AuthFailure::Unavailable(Some(502))
        );
    }

    #[test]
    fn test_messages_fall_back_to_generic() {
        assert_eq!(
            AuthFailure::Duplicate.register_message(),
            "A user with this username or email already exists"
        );
        assert_eq!(
            AuthFailure::Unavailable(None).register_message(),
            GENERIC_REGISTER_MESSAGE
        );
        assert_eq!(AuthFailure::Duplicate.login_message(), GENERIC_LOGIN_MESSAGE);
        assert_eq!(
            AuthFailure::Forbidden.login_message(),
            "Wrong username or password"
        );
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError::Status {
            status: 409,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(AuthFailure::from_api_error(&err), AuthFailure::Duplicate);

        let err = ApiError::Timeout(Duration::from_secs(1));
        assert_eq!(err.status(), None);
        assert_eq!(
            AuthFailure::from_api_error(&err),
            AuthFailure::Unavailable(None)
        );
    }
}
