//! Stable error codes for callers that classify failures (batch exploration, bindings).

/// Every causa error enum maps its variants onto one of the codes below.
pub trait CausaErrorCode {
    /// Returns the error code string (e.g., "HEDGE").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STRUCTURAL_ERROR: &str = "STRUCTURAL_ERROR";
pub const CYCLE_DETECTED: &str = "CYCLE_DETECTED";
pub const HEDGE: &str = "HEDGE";
pub const UNIDENTIFIABLE: &str = "UNIDENTIFIABLE";
pub const EVALUATION_ERROR: &str = "EVALUATION_ERROR";
pub const MODEL_ERROR: &str = "MODEL_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_QUERY: &str = "INVALID_QUERY";
