//! CLI error types.

use adapter_loader::LoaderError;
use thiserror::Error;
use vol_core::types::VolatilityError;

use crate::config::ConfigError;

/// Errors surfaced by `volctl` commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Volatility(#[from] VolatilityError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volatility_error_is_transparent() {
        let err: CliError = VolatilityError::InsufficientData { got: 5, need: 21 }.into();
        assert_eq!(
            err.to_string(),
            "Insufficient data: got 5 observations, need 21"
        );
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = CliError::InvalidArgument("--spot must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid argument: --spot must be positive");
    }
}
