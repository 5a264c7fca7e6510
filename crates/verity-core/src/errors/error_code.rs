//! Stable machine-readable error codes.

/// Every error enum implements this to provide a structured code string,
/// used in JSON output and log fields.
pub trait VerityErrorCode {
    /// Returns the code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display + Sized,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const WORKER_FAILED: &str = "WORKER_FAILED";
pub const SCAN_TIMEOUT: &str = "SCAN_TIMEOUT";
pub const CANCELLED: &str = "CANCELLED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const NO_PACKAGE_MANAGER: &str = "NO_PACKAGE_MANAGER";
pub const DATABASE_MISSING: &str = "DATABASE_MISSING";
pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";
