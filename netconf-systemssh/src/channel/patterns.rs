//! Login output classification.

use super::buffer::OutputAccumulator;

/// Interactive password prompt emitted by the ssh client.
pub const PASSWORD_PROMPT: &[u8] = b"password:";

/// Start of the server's NETCONF `<hello>` capabilities message.
pub const GREETING_START: &[u8] = b"<hello";

/// What the accumulated login output currently shows.
///
/// End-of-stream is the fourth outcome and comes from the read itself,
/// see [`ReadOutcome::Eof`](crate::pty::ReadOutcome::Eof).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginScan {
    /// Neither marker seen yet.
    NeedMoreData,

    /// A password prompt is somewhere in the buffer.
    PasswordPrompt,

    /// The greeting has started.
    GreetingStart,
}

/// Classify the accumulated login output.
///
/// A password prompt takes precedence over a greeting start found in the
/// same buffer, since the prompt must be answered before anything else.
pub fn scan_login_output(output: &OutputAccumulator) -> LoginScan {
    if output.contains_ignore_ascii_case(PASSWORD_PROMPT) {
        LoginScan::PasswordPrompt
    } else if output.contains_ignore_ascii_case(GREETING_START) {
        LoginScan::GreetingStart
    } else {
        LoginScan::NeedMoreData
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(data: &[u8]) -> LoginScan {
        let mut acc = OutputAccumulator::new();
        acc.extend(data);
        scan_login_output(&acc)
    }

    #[test]
    fn test_need_more_data() {
        assert_eq!(scan(b""), LoginScan::NeedMoreData);
        assert_eq!(scan(b"Warning: Permanently added"), LoginScan::NeedMoreData);
        assert_eq!(scan(b"password"), LoginScan::NeedMoreData);
        assert_eq!(scan(b"<hell"), LoginScan::NeedMoreData);
    }

    #[test]
    fn test_password_prompt_any_case() {
        assert_eq!(scan(b"password: "), LoginScan::PasswordPrompt);
        assert_eq!(scan(b"Password:"), LoginScan::PasswordPrompt);
        assert_eq!(scan(b"admin@10.0.0.1's PASSWORD: "), LoginScan::PasswordPrompt);
    }

    #[test]
    fn test_greeting_any_case() {
        assert_eq!(
            scan(b"<hello xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\">"),
            LoginScan::GreetingStart
        );
        assert_eq!(scan(b"<HELLO>"), LoginScan::GreetingStart);
    }

    #[test]
    fn test_banner_containing_prompt_text_triggers() {
        // Substring matching: banner text is not distinguished from a real prompt
        assert_eq!(
            scan(b"Reminder: change your password: quarterly\n"),
            LoginScan::PasswordPrompt
        );
    }
}
