//! Error types for the auth context.

use std::time::Duration;

use thiserror::Error;
use tkeeper_authz_core::CompileError;

/// Machine code for [`AuthError::AccessDenied`].
pub const ACCESS_DENIED: &str = "ACCESS_DENIED";

/// Machine code for [`AuthError::IdentitySource`].
pub const IDENTITY_SOURCE_FAILURE: &str = "IDENTITY_SOURCE_FAILURE";

/// Machine code for [`AuthError::InvalidPattern`].
pub const INVALID_PATTERN: &str = "INVALID_PATTERN";

/// Default message carried by a denial.
pub const DEFAULT_DENIED_MESSAGE: &str = "Access denied";

/// Failure of the external identity source.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The collaborator call failed. The cause is opaque to this crate.
    #[error("identity source unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),

    /// The collaborator did not answer in time.
    #[error("identity source timed out after {0:?}")]
    Timeout(Duration),
}

impl IdentityError {
    /// Wrap any error as an unavailable identity source.
    pub fn unavailable(error: impl Into<anyhow::Error>) -> Self {
        IdentityError::Unavailable(error.into())
    }
}

/// Errors surfaced by the auth context.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A guard found the permission(s) not granted.
    #[error("{message} (required: {})", .permissions.join(", "))]
    AccessDenied {
        permissions: Vec<String>,
        message: String,
    },

    /// Loading the session failed at the identity source.
    #[error("identity source failure: {0}")]
    IdentitySource(#[from] IdentityError),

    /// The identity source returned a malformed grant.
    #[error("invalid permission pattern: {0}")]
    InvalidPattern(#[from] CompileError),
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AccessDenied { .. } => ACCESS_DENIED,
            AuthError::IdentitySource(_) => IDENTITY_SOURCE_FAILURE,
            AuthError::InvalidPattern(_) => INVALID_PATTERN,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, AuthError::AccessDenied { .. })
    }

    /// The permissions a denial was raised for.
    pub fn denied_permissions(&self) -> Option<&[String]> {
        match self {
            AuthError::AccessDenied { permissions, .. } => Some(permissions),
            _ => None,
        }
    }
}

/// Result type for auth context operations.
pub type Result<T> = std::result::Result<T, AuthError>;
