//! Error taxonomy for the relay
//!
//! Every internal step returns [`AppResult`]. Errors are only translated into
//! HTTP responses at the `api` boundary.

use std::fmt;
use thiserror::Error;

/// Result type for relay operations
pub type AppResult<T> = Result<T, AppError>;

/// Input that could not be turned into a provider request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid amount '{value}'")]
    InvalidAmount { value: String },

    #[error("Invalid Tanzanian phone number '{value}'")]
    InvalidPhone { value: String },

    #[error("Missing or invalid field: {field}")]
    InvalidField { field: String },

    #[error("Malformed request body: {message}")]
    MalformedBody { message: String },
}

/// Failures of third-party services
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalError {
    #[error("{provider} error: {message}")]
    PaymentProvider {
        provider: String,
        message: String,
        is_retryable: bool,
    },

    #[error("{service} did not respond in time")]
    Timeout { service: String },

    #[error("Mozello notification failed: {message}")]
    Notification { message: String },
}

/// Failures of local plumbing
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InfrastructureError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("HTTP client error: {message}")]
    HttpClient { message: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppErrorKind {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error(transparent)]
    External(#[from] ExternalError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub context: Option<String>,
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Authentication {
            message: message.into(),
        })
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NotFound {
            entity: entity.into(),
            id: id.into(),
        })
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Infrastructure(
            InfrastructureError::Configuration {
                message: message.into(),
            },
        ))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, AppErrorKind::Authentication { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, AppErrorKind::Validation(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            AppErrorKind::External(ExternalError::PaymentProvider {
                is_retryable: true,
                ..
            }) | AppErrorKind::External(ExternalError::Timeout { .. })
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} ({})", self.kind, context),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::new(AppErrorKind::Validation(err))
    }
}

impl From<ExternalError> for AppError {
    fn from(err: ExternalError) -> Self {
        Self::new(AppErrorKind::External(err))
    }
}

impl From<InfrastructureError> for AppError {
    fn from(err: InfrastructureError) -> Self {
        Self::new(AppErrorKind::Infrastructure(err))
    }
}
