//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name shown in the header.
pub const APP_NAME: &str = "apiscope";

/// Upper bound on how long one dispatch may run before it fails.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Rows consumed by header, footer, and content borders; the rest of
/// the terminal height belongs to scrollable content.
pub const VIEWPORT_CHROME: u16 = 6;

/// Log file name; a TUI cannot log to stdout.
pub const LOG_FILE: &str = "apiscope.log";
