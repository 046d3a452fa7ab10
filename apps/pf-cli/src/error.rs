//! CLI error type wrapping every layer below it.

use std::path::PathBuf;

use pf_analysis::AnalysisError;
use pf_process::ProcessError;
use pf_props::PropsError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read request file: {path}")]
    RequestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid request document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error(transparent)]
    State(#[from] PropsError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Bad input rather than an internal failure.
    pub fn is_client_error(&self) -> bool {
        match self {
            CliError::Yaml(_) | CliError::InvalidArgs(_) => true,
            CliError::RequestRead { .. } | CliError::Json(_) => false,
            CliError::State(e) => e.is_client_error(),
            CliError::Process(e) => e.is_client_error(),
            CliError::Analysis(e) => e.is_client_error(),
        }
    }
}
