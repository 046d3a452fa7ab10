//! Property and state-resolution errors.

use pf_core::PfError;
use thiserror::Error;

/// Result type for property operations.
pub type PropsResult<T> = Result<T, PropsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropsError {
    /// Input pair that the resolver does not know how to solve.
    #[error("Unsupported input pair: ({first}, {second})")]
    UnsupportedInput { first: String, second: String },

    /// Out-of-domain input parameter.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Target property unreachable given its companion.
    #[error("Out of range for {what}: {message}")]
    Range { what: &'static str, message: String },

    /// Root search found no sign change for the requested target.
    #[error("No convergence for {what}: {message}")]
    Convergence { what: &'static str, message: String },

    /// Non-physical computed value.
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error(transparent)]
    Numeric(#[from] PfError),
}

impl PropsError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PropsError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Caller-side mistakes (4xx class) as opposed to internal failures.
    pub fn is_client_error(&self) -> bool {
        match self {
            PropsError::UnsupportedInput { .. }
            | PropsError::Validation { .. }
            | PropsError::Range { .. }
            | PropsError::Convergence { .. } => true,
            PropsError::NonPhysical { .. } => false,
            PropsError::Numeric(e) => matches!(
                e,
                PfError::NoSignChange { .. } | PfError::InvalidArg { .. }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropsError::UnsupportedInput {
            first: "Tdb".into(),
            second: "Tdb".into(),
        };
        assert!(err.to_string().contains("(Tdb, Tdb)"));

        let err = PropsError::validation("RH", "must be within [0, 100], got 140");
        assert!(err.to_string().contains("RH"));
        assert!(err.to_string().contains("140"));
    }

    #[test]
    fn client_error_classification() {
        assert!(PropsError::validation("W", "negative").is_client_error());
        assert!(
            PropsError::Range {
                what: "enthalpy",
                message: "above saturation".into()
            }
            .is_client_error()
        );
        assert!(!PropsError::NonPhysical { what: "pressure" }.is_client_error());
        assert!(
            !PropsError::from(PfError::MaxIterations {
                what: "dew point",
                iterations: 100
            })
            .is_client_error()
        );
    }
}
