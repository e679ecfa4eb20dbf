//! Unified error handling for msk-inspect
//!
//! Every operation fails with [`MskError`]. Remote failures are carried as a
//! [`RemoteApiError`] exactly as the [`KafkaApi`](crate::KafkaApi) backend
//! reported them.
//!
//! # Example
//!
//! ```rust
//! use msk_inspect::{MskError, RemoteApiError, RemoteErrorKind};
//!
//! let remote = RemoteApiError::new(
//!     "DescribeCluster",
//!     RemoteErrorKind::NotFound,
//!     "cluster does not exist",
//! );
//! let err: MskError = remote.into();
//! assert!(err.is_not_found());
//! assert!(!err.is_retryable());
//! ```

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type for all metadata queries
#[derive(Error, Debug)]
pub enum MskError {
    /// The session provider could not produce credentials for the region
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The remote management API call failed
    #[error(transparent)]
    Remote(#[from] RemoteApiError),

    /// Local input check failed (e.g. empty identifier)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote call succeeded but the response lacked the requested field
    #[error("{operation} response did not include {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    /// Profile configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for metadata queries
pub type Result<T> = std::result::Result<T, MskError>;

/// Failure to build an authenticated session for a region
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to authenticate for region '{region}': {message}")]
pub struct AuthError {
    pub region: String,
    pub message: String,
}

impl AuthError {
    pub fn new(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            message: message.into(),
        }
    }
}

/// Classification of a remote API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    TooManyRequests,
    ServiceUnavailable,
    InternalServerError,
    /// The request never produced a response (connect failure, timeout)
    Transport,
    Other,
}

impl RemoteErrorKind {
    /// Map an MSK error code (the `x-amzn-ErrorType` value) to a kind
    pub fn from_code(code: &str) -> Self {
        match code {
            "NotFoundException" => Self::NotFound,
            "BadRequestException" => Self::BadRequest,
            "UnauthorizedException" => Self::Unauthorized,
            "ForbiddenException" | "AccessDeniedException" => Self::Forbidden,
            "TooManyRequestsException" | "ThrottlingException" => Self::TooManyRequests,
            "ServiceUnavailableException" => Self::ServiceUnavailable,
            "InternalServerErrorException" => Self::InternalServerError,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::TooManyRequests => "too many requests",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalServerError => "internal server error",
            Self::Transport => "transport failure",
            Self::Other => "error",
        };
        f.write_str(s)
    }
}

/// A failed call to the remote management API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed ({kind}): {message}")]
pub struct RemoteApiError {
    /// Remote operation name, e.g. `DescribeCluster`
    pub operation: &'static str,
    pub kind: RemoteErrorKind,
    /// Service error code when the remote side supplied one
    pub code: Option<String>,
    pub message: String,
}

impl RemoteApiError {
    pub fn new(operation: &'static str, kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl MskError {
    /// The remote failure, if this error came from the management API
    pub fn as_remote(&self) -> Option<&RemoteApiError> {
        match self {
            MskError::Remote(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the identifier or revision is unknown to the remote API
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.remote_kind() == Some(RemoteErrorKind::NotFound)
    }

    /// Returns true if this is an authentication/authorization error
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            MskError::Auth(_) => true,
            MskError::Remote(e) => matches!(
                e.kind,
                RemoteErrorKind::Unauthorized | RemoteErrorKind::Forbidden
            ),
            _ => false,
        }
    }

    /// Returns true if the remote side reported a server error
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.remote_kind(),
            Some(RemoteErrorKind::InternalServerError | RemoteErrorKind::ServiceUnavailable)
        )
    }

    /// Returns true if this is a rate limiting error
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.remote_kind() == Some(RemoteErrorKind::TooManyRequests)
    }

    /// Returns true if this is a bad request error
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        match self {
            MskError::Remote(e) => e.kind == RemoteErrorKind::BadRequest,
            MskError::Validation(_) => true,
            _ => false,
        }
    }

    /// Returns true if the same call could succeed when issued again.
    ///
    /// Nothing in this crate retries; callers decide.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.remote_kind(),
            Some(
                RemoteErrorKind::TooManyRequests
                    | RemoteErrorKind::ServiceUnavailable
                    | RemoteErrorKind::InternalServerError
                    | RemoteErrorKind::Transport
            )
        )
    }

    fn remote_kind(&self) -> Option<RemoteErrorKind> {
        self.as_remote().map(|e| e.kind)
    }
}
