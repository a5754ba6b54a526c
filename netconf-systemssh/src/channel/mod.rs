//! Channel layer for login output accumulation and classification.
//!
//! The PTY stream has no message framing, so the login dialogue is driven
//! by substring scans over everything read since the last password prompt.

mod buffer;
mod patterns;

pub use buffer::OutputAccumulator;
pub use patterns::{GREETING_START, LoginScan, PASSWORD_PROMPT, scan_login_output};
