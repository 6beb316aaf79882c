use serde::Serialize;
use thiserror::Error;

/// Failures reported by (or while talking to) the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("A user is already signed in")]
    SessionExists,

    #[error("No signed-in user")]
    NoSession,

    #[error("Account not confirmed: {0}")]
    NotConfirmed(String),

    #[error("Session no longer matches the signed-in user")]
    Stale,

    #[error("Sign-in was superseded by a later session change")]
    Superseded,

    #[error("Identity check timed out")]
    Timeout,

    #[error("Identity provider error ({code}): {message}")]
    Provider { code: String, message: String },

    #[error("Identity provider unreachable: {0}")]
    Network(String),
}

impl AuthError {
    /// True when the caller can recover by signing out first and retrying.
    pub fn is_recoverable_by_force(&self) -> bool {
        matches!(self, AuthError::SessionExists)
    }
}

/// A single offending form field, addressed by path (e.g. `experiences[1].company`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Local validation failure. Always carries at least one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed for: {}", field_list(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError::new(field, message)],
        }
    }

    /// Returns `Ok(())` when nothing was collected.
    pub fn from_fields(fields: Vec<FieldError>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Self { fields })
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }
}

fn field_list(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures talking to the profile or résumé-build endpoints.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend response is missing {0}")]
    MissingField(&'static str),
}

/// Application-level error type surfaced to the UI layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// What the UI shows for an error: a stable code plus a human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMessage {
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    /// Maps the error to a user-visible message, logging internal detail.
    pub fn user_facing(&self) -> UserMessage {
        let (code, message) = match self {
            AppError::Auth(AuthError::InvalidCredentials(_)) => (
                "INVALID_CREDENTIALS",
                "Incorrect email or password".to_string(),
            ),
            AppError::Auth(AuthError::SessionExists) => (
                "SESSION_EXISTS",
                "You are already signed in. Sign in anyway to replace the current session."
                    .to_string(),
            ),
            AppError::Auth(AuthError::NotConfirmed(_)) => (
                "NOT_CONFIRMED",
                "Confirm your account with the code we sent before signing in".to_string(),
            ),
            AppError::Auth(AuthError::NoSession | AuthError::Stale | AuthError::Superseded) => (
                "UNAUTHENTICATED",
                "Please sign in to continue".to_string(),
            ),
            AppError::Auth(e) => {
                tracing::error!("Identity provider error: {e}");
                (
                    "AUTH_ERROR",
                    "Could not reach the sign-in service. Try again.".to_string(),
                )
            }
            AppError::Validation(e) => ("VALIDATION_ERROR", e.to_string()),
            AppError::Backend(e) => {
                tracing::error!("Backend error: {e}");
                (
                    "BACKEND_ERROR",
                    "The server could not process the request. Try again.".to_string(),
                )
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::InvalidTransition(msg) => ("INVALID_TRANSITION", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("INTERNAL_ERROR", "Something went wrong".to_string())
            }
        };

        UserMessage { code, message }
    }
}
