//! Error handling for verity.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod provider_error;
pub mod scan_error;
pub mod verity_error;

pub use config_error::ConfigError;
pub use error_code::VerityErrorCode;
pub use provider_error::ProviderError;
pub use scan_error::ScanError;
pub use verity_error::VerityError;
