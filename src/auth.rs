use crate::api::AuthApi;
use crate::error::{AuthFailure, StorageError};
use crate::models::{LoginRequest, RegisterRequest};
use crate::session::{Session, SessionStorage};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Form field an inline validation message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
    Terms,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "password confirmation",
            Field::Terms => "terms",
        };
        f.write_str(name)
    }
}

/// Inline validation messages, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<(Field, &'static str)>);

impl FormErrors {
    fn push(&mut self, field: Field, message: &'static str) {
        self.0.push((field, message));
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Field, &'static str)> {
        self.0.iter()
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(field, m)| format!("{}: {}", field, m)).collect();
        f.write_str(&parts.join("; "))
    }
}

fn check_password(errors: &mut FormErrors, password: &str) {
    if password.is_empty() {
        errors.push(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(Field::Password, "Password must be at least 6 characters");
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.push(Field::Username, "Username is required");
        }
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.push(Field::Username, "Username is required");
        }

        if self.email.trim().is_empty() {
            errors.push(Field::Email, "Email is required");
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.push(Field::Email, "Email format is invalid");
        }

        check_password(&mut errors, &self.password);
        if self.password != self.confirm_password {
            errors.push(Field::ConfirmPassword, "Passwords do not match");
        }
        if !self.accept_terms {
            errors.push(Field::Terms, "You must accept the terms");
        }
        errors.into_result()
    }
}

/// Why a login or registration attempt did not go through
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(FormErrors),

    #[error("{0}")]
    Rejected(AuthFailure),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Validates, calls the login endpoint and stores the session.
/// Returns the username the session was stored under.
pub async fn login<A: AuthApi, S: SessionStorage>(
    api: &A,
    session: &Session<S>,
    form: &LoginForm,
) -> Result<String, AuthError> {
    form.validate().map_err(AuthError::Validation)?;

    let request = LoginRequest {
        username: form.username.trim().to_string(),
        password: form.password.clone(),
    };
    let response = api.login(&request).await.map_err(|e| {
        let failure = AuthFailure::from_api_error(&e);
        ::log::warn!("Login for {} failed: {}", request.username, e);
        AuthError::Rejected(failure)
    })?;

    let username = response
        .reported_username()
        .unwrap_or(request.username.as_str())
        .to_string();
    session.store_login(&response.token, &username, response.user.as_ref())?;
    Ok(username)
}

/// Validates and calls the registration endpoint.
/// Returns the email so the login form can be prefilled.
pub async fn register<A: AuthApi>(api: &A, form: &RegisterForm) -> Result<String, AuthError> {
    form.validate().map_err(AuthError::Validation)?;

    let request = RegisterRequest {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };
    api.register(&request).await.map_err(|e| {
        ::log::warn!("Registration for {} failed: {}", request.username, e);
        AuthError::Rejected(AuthFailure::from_api_error(&e))
    })?;

    ::log::info!("Registered {}", request.username);
    Ok(request.email)
}
