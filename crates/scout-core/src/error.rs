use thiserror::Error;

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API key was rejected
    #[error("authentication failed: invalid API key")]
    Unauthorized,

    /// Too many requests
    #[error("rate limit exceeded{}", retry_hint(*.retry_after))]
    RateLimited {
        /// Seconds the server asked us to wait, if it said
        retry_after: Option<u64>,
    },

    /// The account has run out of query or scan credits
    #[error("insufficient credits for this request")]
    InsufficientCredits,

    /// Resource not found
    #[error("not found: {resource}")]
    NotFound {
        /// What the server said was missing
        resource: String,
    },

    /// Any other non-success response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the response body
        message: String,
    },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request did not complete in time
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Response body was not what we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL or path could not be assembled
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

fn retry_hint(retry_after: Option<u64>) -> String {
    retry_after.map_or_else(String::new, |secs| format!(", retry after {secs}s"))
}

impl ApiError {
    /// Returns true if repeating the request may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Http(_)
        ) || matches!(self, Self::Api { code, .. } if *code >= 500)
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP status code behind this error, when there is one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::InsufficientCredits => Some(402),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(ApiError::RateLimited { retry_after: None }.is_retryable());
        assert!(ApiError::Timeout(30).is_retryable());
        assert!(ApiError::Api { code: 503, message: String::new() }.is_retryable());
        assert!(!ApiError::Api { code: 400, message: String::new() }.is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), Some(401));
        assert_eq!(
            ApiError::NotFound { resource: "host".into() }.status_code(),
            Some(404)
        );
        assert_eq!(ApiError::Http("reset".into()).status_code(), None);
    }

    #[test]
    fn test_rate_limit_message() {
        let err = ApiError::RateLimited { retry_after: Some(2) };
        assert_eq!(err.to_string(), "rate limit exceeded, retry after 2s");
        let err = ApiError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "rate limit exceeded");
    }
}
