//! Error types for ADP/BF operations.

use pf_core::PfError;
use pf_props::PropsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The process line never meets the saturation curve in the search bounds.
    #[error("No saturation intersection: {what}")]
    NoIntersection { what: String },

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("State error: {0}")]
    State(#[from] PropsError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] PfError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub fn is_client_error(&self) -> bool {
        match self {
            SolverError::NoIntersection { .. } | SolverError::Validation { .. } => true,
            SolverError::State(e) => e.is_client_error(),
            SolverError::Numeric(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_and_class() {
        let err = SolverError::NoIntersection {
            what: "line from (80, 0.011) never reaches saturation".into(),
        };
        assert!(err.to_string().contains("never reaches"));
        assert!(err.is_client_error());

        let err: SolverError = PropsError::NonPhysical { what: "pressure" }.into();
        assert!(!err.is_client_error());
    }
}
