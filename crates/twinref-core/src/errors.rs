//! Error types for the twinref core library.

/// Top-level error enum for the twinref core library.
#[derive(Debug, thiserror::Error)]
pub enum TwinRefError {
    #[error("Service error: {0}")]
    Service(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("Template error: {0}")]
    Template(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TwinRefError {
    /// Whether this error came from the caller's context rather than the
    /// remote service.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, TwinRefError::Cancelled | TwinRefError::DeadlineExceeded)
    }
}

pub type TwinRefResult<T> = Result<T, TwinRefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = TwinRefError::Service("throttled".to_string());
        assert_eq!(err.to_string(), "Service error: throttled");
        assert!(!err.is_interrupt());
    }

    #[test]
    fn test_interrupts() {
        assert!(TwinRefError::Cancelled.is_interrupt());
        assert!(TwinRefError::DeadlineExceeded.is_interrupt());
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: TwinRefError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
