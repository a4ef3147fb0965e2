//! Error taxonomy for schema building, curve evaluation and plotting.
//!
//! Every variant maps to a process exit code so the binary can abort a run
//! with a stable status:
//!
//! - `2`: bad configuration or unreadable input
//! - `3`: sample tables that cannot be matched to a parametrization
//! - `4`: computation failures (evaluator rejected a parameter vector)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad family / node count / settings at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A declared parameter was absent from the supplied value mapping.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// Column names do not identify a unique family / node count.
    #[error("ambiguous schema: {0}")]
    AmbiguousSchema(String),

    /// The flexknot evaluator rejected its input vector.
    #[error("evaluator error: {0}")]
    Evaluator(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering backend failure.
    #[error("plot error: {0}")]
    Plot(String),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::AmbiguousSchema(message.into())
    }

    pub fn evaluator(message: impl Into<String>) -> Self {
        Self::Evaluator(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InvalidConfiguration(_)
            | AppError::MissingParameter(_)
            | AppError::Io(_)
            | AppError::Csv(_)
            | AppError::Json(_) => 2,
            AppError::AmbiguousSchema(_) | AppError::Plot(_) => 3,
            AppError::Evaluator(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_taxonomy() {
        assert_eq!(AppError::invalid("n=-1").exit_code(), 2);
        assert_eq!(AppError::MissingParameter("w1".into()).exit_code(), 2);
        assert_eq!(AppError::ambiguous("no columns").exit_code(), 3);
        assert_eq!(AppError::evaluator("even theta").exit_code(), 4);
    }

    #[test]
    fn missing_parameter_names_the_key() {
        let err = AppError::MissingParameter("w1".into());
        assert_eq!(err.to_string(), "missing parameter 'w1'");
    }
}
