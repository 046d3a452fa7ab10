//! Analysis errors.

use pf_process::ProcessError;
use pf_props::PropsError;
use pf_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("State error: {0}")]
    State(#[from] PropsError),

    #[error("ADP/BF error: {0}")]
    Solver(#[from] SolverError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AnalysisError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        match self {
            AnalysisError::Validation { .. } => true,
            AnalysisError::State(e) => e.is_client_error(),
            AnalysisError::Solver(e) => e.is_client_error(),
            AnalysisError::Process(e) => e.is_client_error(),
        }
    }
}
