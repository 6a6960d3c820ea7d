//! Process exit codes.
//!
//! Scripts can tell a bad invocation from a flaky network or a rejected key
//! by the code alone.

use scout_core::ApiError;

use crate::cli::commands::MissingApiKey;
use crate::output::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// Invalid arguments, unknown or unsupported output format
    UsageError = 2,

    /// Retryable failure: timeout, rate limit, 5xx
    NetworkError = 3,

    /// API key missing or rejected
    AuthError = 4,

    /// The requested resource does not exist
    NotFound = 5,
}

impl ExitCode {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Pick the code for a failed command by looking through the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.downcast_ref::<FormatError>().is_some() || cause.downcast_ref::<UsageError>().is_some() {
                return Self::UsageError;
            }
            if cause.downcast_ref::<MissingApiKey>().is_some() {
                return Self::AuthError;
            }
            if let Some(api) = cause.downcast_ref::<ApiError>() {
                return Self::from_api_error(api);
            }
        }
        Self::GeneralError
    }

    const fn from_api_error(err: &ApiError) -> Self {
        if err.is_auth_error() {
            Self::AuthError
        } else if matches!(err, ApiError::NotFound { .. }) {
            Self::NotFound
        } else if err.is_retryable() {
            Self::NetworkError
        } else {
            Self::GeneralError
        }
    }
}

/// A flag combination or argument that cannot work, found after parsing.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UsageError(pub String);
