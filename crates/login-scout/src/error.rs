//! Error taxonomy for a scrape.
//!
//! Every tier converts its own failures into a [`ScoutError`] locally, and
//! the orchestrator surfaces at most one of them per request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable error code, serialized as `SCREAMING_SNAKE_CASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The input was not an absolute http(s) URL. No request was made.
    InvalidUrl,
    /// The static HTTP fetch failed (transport, timeout, or status).
    FetchError,
    /// Both tiers ran and neither found a login input.
    NoLoginElements,
    /// The headless browser could not be launched or failed to render.
    DynamicFetchError,
    /// Unexpected fault, reported generically.
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::FetchError => "FETCH_ERROR",
            ErrorCode::NoLoginElements => "NO_LOGIN_ELEMENTS",
            ErrorCode::DynamicFetchError => "DYNAMIC_FETCH_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All terminal failures a scrape can produce.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoutError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch content from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to render {url} in headless browser: {reason}")]
    DynamicFetch { url: String, reason: String },

    #[error("No login elements found on {0}")]
    NoLoginElements(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScoutError {
    pub fn fetch(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        ScoutError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn dynamic(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        ScoutError::DynamicFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// The error code this failure is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            ScoutError::InvalidUrl(_) => ErrorCode::InvalidUrl,
            ScoutError::Fetch { .. } => ErrorCode::FetchError,
            ScoutError::DynamicFetch { .. } => ErrorCode::DynamicFetchError,
            ScoutError::NoLoginElements(_) => ErrorCode::NoLoginElements,
            ScoutError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

/// Wire form of a [`ScoutError`]: a message plus its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub error: String,
    pub error_code: ErrorCode,
}

impl From<&ScoutError> for ErrorInfo {
    fn from(err: &ScoutError) -> Self {
        ErrorInfo {
            error: err.to_string(),
            error_code: err.code(),
        }
    }
}

impl From<ScoutError> for ErrorInfo {
    fn from(err: ScoutError) -> Self {
        ErrorInfo::from(&err)
    }
}
