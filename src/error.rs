//! Stable error codes shared by the crate's error enums.
//!
//! Each error type maps its variants to a short `E_*` code so a JavaScript
//! host can branch on failures without parsing messages.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Error types that carry a stable, machine-readable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    /// `"E_CODE: message"`, the form handed to the host.
    fn describe(&self) -> String {
        format!("{}: {self}", self.error_code())
    }
}
