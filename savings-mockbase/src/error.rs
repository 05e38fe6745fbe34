//! Error types for savings-mockbase — Railway Programming
//!
//! Internal operations return `Result<T, MockbaseError>`. Nothing crosses the
//! façade boundary as an `Err`: query and auth calls convert failures into an
//! [`ApiError`] carried inside the response object, which is the contract the
//! application code branches on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all internal mockbase operations
#[derive(Error, Debug)]
pub enum MockbaseError {
    // ─── Store Errors ───

    #[error("Record for table '{table}' must be a JSON object, got {kind}")]
    NotAnObject { table: String, kind: &'static str },

    #[error("Update patch must be a JSON object, got {0}")]
    InvalidPatch(&'static str),

    // ─── Auth Errors ───

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    // ─── Infrastructure Errors ───

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Actor unavailable: {0}")]
    ActorUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for MockbaseError {
    fn from(err: serde_json::Error) -> Self {
        MockbaseError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for MockbaseError {
    fn from(err: url::ParseError) -> Self {
        MockbaseError::Config(format!("URL parse error: {err}"))
    }
}

/// Result type alias for mockbase operations
pub type Result<T> = std::result::Result<T, MockbaseError>;

/// Error codes surfaced to callers inside a response object.
///
/// `NotSingular` is shared by the "no rows" and "more than one row" outcomes
/// of `single()`; callers match on the code, so both keep `PGRST116`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "INSERT_ERROR")]
    Insert,
    #[serde(rename = "QUERY_ERROR")]
    Query,
    #[serde(rename = "PGRST116")]
    NotSingular,
    #[serde(rename = "AUTH_ERROR")]
    Auth,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT_ERROR",
            Self::Query => "QUERY_ERROR",
            Self::NotSingular => "PGRST116",
            Self::Auth => "AUTH_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error object carried in the `error` slot of every response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            details: None,
            hint: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotSingular, "Record not found")
    }

    pub fn multiple_found() -> Self {
        Self::new(ErrorCode::NotSingular, "Multiple records found")
    }

    /// Wrap an internal failure under the given boundary code
    pub fn from_internal(code: ErrorCode, err: &MockbaseError) -> Self {
        Self::new(code, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_to_wire_strings() {
        let err = ApiError::not_found();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "PGRST116");
        assert_eq!(json["message"], "Record not found");
        assert!(json.get("details").is_none());

        assert_eq!(
            serde_json::to_value(ErrorCode::Insert).unwrap(),
            serde_json::json!("INSERT_ERROR")
        );
    }

    #[test]
    fn test_not_found_and_multiple_share_code() {
        assert_eq!(ApiError::not_found().code, ApiError::multiple_found().code);
        assert_ne!(ApiError::not_found().message, ApiError::multiple_found().message);
    }
}
