use thiserror::Error;

pub type PfResult<T> = Result<T, PfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("No sign change for {what} in [{lo}, {hi}]")]
    NoSignChange {
        what: &'static str,
        lo: f64,
        hi: f64,
    },

    #[error("Root search for {what} did not converge after {iterations} iterations")]
    MaxIterations {
        what: &'static str,
        iterations: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PfError::NoSignChange {
            what: "dew point",
            lo: 20.0,
            hi: 75.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("dew point"));
        assert!(msg.contains("75"));
    }
}
