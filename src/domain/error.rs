//! Domain error types.

/// Top-level error type for goldwatch.
#[derive(Debug, thiserror::Error)]
pub enum GoldwatchError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("division by zero: {context}")]
    DivisionByZero { context: String },

    #[error("persistence error in namespace {namespace}: {reason}")]
    Persistence { namespace: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GoldwatchError {
    /// Shorthand for rejecting a calculator argument.
    pub fn invalid_input(field: &str, reason: &str) -> Self {
        GoldwatchError::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<&GoldwatchError> for std::process::ExitCode {
    fn from(err: &GoldwatchError) -> Self {
        let code: u8 = match err {
            GoldwatchError::Io(_) => 1,
            GoldwatchError::ConfigParse { .. } | GoldwatchError::ConfigInvalid { .. } => 2,
            GoldwatchError::Persistence { .. } => 3,
            GoldwatchError::InvalidInput { .. } | GoldwatchError::DivisionByZero { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn invalid_input_display() {
        let err = GoldwatchError::invalid_input("current_price", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid input for current_price: must be positive"
        );
    }

    #[test]
    fn division_by_zero_display() {
        let err = GoldwatchError::DivisionByZero {
            context: "entry price equals stop loss".into(),
        };
        assert!(err.to_string().contains("entry price equals stop loss"));
    }

    #[test]
    fn exit_code_mapping() {
        let err = GoldwatchError::invalid_input("atr", "must be positive");
        let _code: ExitCode = (&err).into();

        let err = GoldwatchError::ConfigInvalid {
            section: "feed".into(),
            key: "volatility".into(),
            reason: "must be non-negative".into(),
        };
        let _code: ExitCode = (&err).into();
    }
}
