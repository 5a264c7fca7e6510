//! Top-level error aggregating the subsystem errors.

use super::error_code::VerityErrorCode;
use super::{ConfigError, ProviderError, ScanError};

#[derive(Debug, thiserror::Error)]
pub enum VerityError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Package manager error: {0}")]
    Provider(#[from] ProviderError),
}

impl VerityErrorCode for VerityError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Provider(e) => e.error_code(),
        }
    }
}
