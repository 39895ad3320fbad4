//! Centralized Error Handling Module
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - INPUT_xxx: request validation errors
//! - UPSTREAM_xxx: signal-source errors (non-fatal by design)
//! - NET_xxx: resolver/network errors
//! - API_xxx: API errors

use std::fmt;

/// Application-wide error type.
///
/// Only `InputInvalid`, `ApiRateLimited` and `ApiInternalError` ever reach
/// the HTTP boundary; upstream and resolver failures are folded into
/// reduced confidence instead.
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors (4xx)
    // ============================================
    /// Missing, empty or non-string input
    InputInvalid,
    /// Input exceeds the length limit
    InputTooLong,

    // ============================================
    // API Errors
    // ============================================
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Upstream Signal Sources (non-fatal)
    // ============================================
    /// GoPlus unavailable
    GoPlusUnavailable,
    /// DexScreener unavailable
    DexScreenerUnavailable,
    /// Sourcify unavailable
    SourcifyUnavailable,
    /// ENS resolution failed
    EnsResolutionFailed,

    // ============================================
    // Resolver / Network (non-fatal)
    // ============================================
    /// Target resolved to private/reserved address space
    SsrfBlocked,
    /// Upstream request timed out
    NetTimeout,
    /// Hostname did not resolve
    NetDns,

    // ============================================
    // Generic
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputInvalid => "INPUT_INVALID",
            Self::InputTooLong => "INPUT_TOO_LONG",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::GoPlusUnavailable => "UPSTREAM_GOPLUS_UNAVAILABLE",
            Self::DexScreenerUnavailable => "UPSTREAM_DEXSCREENER_UNAVAILABLE",
            Self::SourcifyUnavailable => "UPSTREAM_SOURCIFY_UNAVAILABLE",
            Self::EnsResolutionFailed => "UPSTREAM_ENS_RESOLUTION_FAILED",
            Self::SsrfBlocked => "NET_SSRF_BLOCKED",
            Self::NetTimeout => "NET_TIMEOUT",
            Self::NetDns => "NET_DNS",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InputInvalid | Self::InputTooLong => 400,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Missing or empty input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InputInvalid, msg)
    }

    /// Input over the length limit
    pub fn input_too_long(limit: usize) -> Self {
        Self::new(
            ErrorCode::InputTooLong,
            format!("Input exceeds maximum length of {} characters", limit),
        )
    }

    /// Rate limit exceeded
    pub fn rate_limited() -> Self {
        Self::new(
            ErrorCode::ApiRateLimited,
            "Too many requests. Please wait a moment and try again",
        )
    }

    /// Internal error with a generic outward message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::NetTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::NetDns, "Connection failed")
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::rate_limited();
        assert_eq!(err.code, ErrorCode::ApiRateLimited);
        assert_eq!(err.code_str(), "API_RATE_LIMITED");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::InputInvalid.http_status(), 400);
        assert_eq!(ErrorCode::InputTooLong.http_status(), 400);
        assert_eq!(ErrorCode::ApiRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::ApiInternalError.http_status(), 500);
    }

    #[test]
    fn test_input_too_long_names_limit() {
        let err = AppError::input_too_long(2000);
        assert!(err.message.contains("2000"));
    }
}
