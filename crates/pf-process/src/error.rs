//! Process solver errors.

use pf_props::PropsError;
use pf_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Target unreachable along the process curve.
    #[error("Out of range for {what}: {message}")]
    Range { what: &'static str, message: String },

    #[error("State error: {0}")]
    State(#[from] PropsError),

    #[error("ADP/BF error: {0}")]
    Solver(#[from] SolverError),
}

impl ProcessError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ProcessError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        match self {
            ProcessError::Validation { .. } | ProcessError::Range { .. } => true,
            ProcessError::State(e) => e.is_client_error(),
            ProcessError::Solver(e) => e.is_client_error(),
        }
    }
}
