//! Domain errors for the ragchat service.

use thiserror::Error;

/// Domain-level errors shared by ports and their adapters.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Errors that can occur when calling the chat-completion API
///
/// # Retry Decision
/// - Retry on: request timeout, connection failure
/// - Do NOT retry: any HTTP error status (including 429 and 5xx), missing
///   credential, unbuildable request, malformed response
#[derive(Debug, Clone, Error)]
pub enum ChatApiError {
    /// No API credential configured; raised before any network call
    #[error("LLM API key is not configured")]
    MissingApiKey,

    /// The request could not be built (bad URL, invalid header value)
    #[error("Invalid LLM API request: {0}")]
    InvalidRequest(String),

    /// The API answered with an error status
    #[error("LLM API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A single attempt exceeded its timeout
    #[error("LLM API request timed out")]
    Timeout,

    /// The connection could not be established or was dropped
    #[error("LLM API connection failed: {0}")]
    Connection(String),

    /// The API answered 2xx but the payload was unusable
    #[error("LLM API returned an invalid response: {0}")]
    InvalidResponse(String),

    /// Transient failures persisted through every attempt
    #[error("LLM API unavailable after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<ChatApiError>,
    },
}

impl ChatApiError {
    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        matches!(self, ChatApiError::Timeout | ChatApiError::Connection(_))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = DomainError::DimensionMismatch {
            expected: 1536,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Embedding dimension mismatch: expected 1536, got 3"
        );
    }

    #[test]
    fn test_transient_errors() {
        assert!(ChatApiError::Timeout.is_transient());
        assert!(ChatApiError::Connection("refused".to_string()).is_transient());
    }

    #[test]
    fn test_status_errors_are_terminal() {
        for status in [400, 401, 429, 500, 503] {
            let err = ChatApiError::Status {
                status,
                message: "nope".to_string(),
            };
            assert!(!err.is_transient(), "HTTP {status} must not be retried");
        }
        assert!(!ChatApiError::MissingApiKey.is_transient());
        assert!(!ChatApiError::InvalidRequest("bad url".to_string()).is_transient());
        assert!(!ChatApiError::InvalidResponse("empty".to_string()).is_transient());
    }

    #[test]
    fn test_retries_exhausted_message_includes_last_error() {
        let err = ChatApiError::RetriesExhausted {
            attempts: 3,
            last: Box::new(ChatApiError::Timeout),
        };
        assert_eq!(
            err.to_string(),
            "LLM API unavailable after 3 attempts: LLM API request timed out"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DomainError = parse_err.into();
        assert!(matches!(err, DomainError::SerializationError(_)));
    }
}
