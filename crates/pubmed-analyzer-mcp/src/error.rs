//! Error types for the PubMed analyzer MCP server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Each layer has its own enum; `ToolError` is what the MCP dispatch layer sees.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from the E-utilities HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by NCBI (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// JSON parsing error (esearch)
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// XML parsing error (efetch)
    #[error("Failed to parse PubMed XML: {0}")]
    Xml(String),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors from the result-set store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No result set with this name exists.
    #[error("Result set not found: {name}")]
    NotFound {
        /// Requested file name
        name: String,
    },

    /// Name is empty or tries to escape the results directory.
    #[error("Invalid result set name '{name}'")]
    InvalidName {
        /// Offending name
        name: String,
    },

    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON result file could not be decoded.
    #[error("Malformed result file {name}: {source}")]
    Json {
        /// File name
        name: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Text result file could not be decoded.
    #[error("Malformed result file {name}: {message}")]
    Format {
        /// File name
        name: String,
        /// What went wrong
        message: String,
    },
}

impl StoreError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an I/O error for `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Errors from the analysis engine.
///
/// The kinds are preserved all the way to the caller: `NotFound` when the
/// result set does not resolve, `InvalidParameter` for malformed requests.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    /// Malformed top_n, granularity or date range.
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter {
        /// Parameter name as the caller spelled it
        parameter: String,
        /// What is wrong with it
        message: String,
    },

    /// Requested result set is absent.
    #[error("Result set not found: {name}")]
    NotFound {
        /// Requested file name
        name: String,
    },

    /// Store failure other than a missing result set.
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl AnalysisError {
    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter { parameter: parameter.into(), message: message.into() }
    }

    /// True for `InvalidParameter`.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// True for `NotFound`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoreError> for AnalysisError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { name } => Self::NotFound { name },
            StoreError::InvalidName { name } => {
                Self::invalid("filename", format!("'{name}' is not a valid result file name"))
            }
            other => Self::Store(other),
        }
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the E-utilities client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Error from the analysis engine
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Error from the result store
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal tool logic error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Resource not available
    #[error("Resource unavailable: {0}")]
    Unavailable(String),
}

impl ToolError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Convert to a user-friendly error message for MCP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(ClientError::RateLimited { retry_after }) => {
                format!(
                    "Rate limited by NCBI E-utilities. Please wait {:?} before retrying.",
                    retry_after
                )
            }
            Self::Analysis(AnalysisError::NotFound { name })
            | Self::Store(StoreError::NotFound { name }) => {
                format!(
                    "Result file not found: {name}. Use list_result_files to see available files."
                )
            }
            Self::Analysis(AnalysisError::InvalidParameter { parameter, message })
            | Self::Validation { field: parameter, message } => {
                format!("Invalid input for '{parameter}': {message}")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited(60).is_retryable());
        assert!(ClientError::server(500, "Internal error").is_retryable());

        assert!(!ClientError::not_found("esearch").is_retryable());
        assert!(!ClientError::bad_request("invalid term").is_retryable());
    }

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited(60);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = ClientError::not_found("efetch");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_store_not_found_keeps_kind() {
        let err: AnalysisError = StoreError::not_found("missing.json").into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_invalid_name_is_invalid_parameter() {
        let err: AnalysisError = StoreError::InvalidName { name: "../etc".into() }.into();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_tool_error_user_message() {
        let err = ToolError::validation("advanced_search", "cannot be empty");
        assert!(err.to_user_message().contains("advanced_search"));
        assert!(err.to_user_message().contains("cannot be empty"));

        let err = ToolError::from(AnalysisError::invalid("top_n", "must be positive"));
        assert!(err.to_user_message().contains("top_n"));

        let err = ToolError::from(AnalysisError::NotFound { name: "x.json".into() });
        assert!(err.to_user_message().contains("list_result_files"));
    }
}
