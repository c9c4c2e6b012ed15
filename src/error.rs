//! Error types.
//!
//! - `PipelineError`: failures detected inside the acquirer/reporter stages.
//! - `AppError`: what the binary reports at the outermost boundary (message +
//!   process exit code).

use thiserror::Error;

/// A failure detected by one of the pipeline stages.
///
/// Every variant carries a human-readable cause; the localized operator message
/// is built from it in `crate::messages`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("empty result: {0}")]
    EmptyResult(String),

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    StorageFailure(String),

    #[error("render failure: {0}")]
    RenderFailure(String),
}

impl PipelineError {
    /// Process exit code used when this error reaches `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::InvalidInput(_) => 2,
            PipelineError::TransportFailure(_)
            | PipelineError::EmptyResult(_)
            | PipelineError::ParseFailure(_) => 4,
            PipelineError::NotFound(_) | PipelineError::StorageFailure(_) => 5,
            PipelineError::RenderFailure(_) => 6,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
    /// Already shown to the operator by the stage that failed.
    reported: bool,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
            reported: false,
        }
    }

    /// Wrap a stage failure that has not been shown to the operator yet.
    pub fn unreported(err: PipelineError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn is_reported(&self) -> bool {
        self.reported
    }
}

/// Stage entry points print their own diagnostics before returning.
impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        Self {
            reported: true,
            ..Self::unreported(err)
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .field("reported", &self.reported)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_distinct_exit_codes() {
        let err: AppError = PipelineError::InvalidInput("month 13".into()).into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "invalid input: month 13");
        assert!(err.is_reported());
        assert!(!AppError::unreported(PipelineError::StorageFailure("disk".into())).is_reported());

        assert_eq!(PipelineError::NotFound("k".into()).exit_code(), 5);
        assert_eq!(PipelineError::RenderFailure("x".into()).exit_code(), 6);
        assert_eq!(PipelineError::EmptyResult("x".into()).exit_code(), 4);
    }
}
