//! Diagnostics for ssh client output seen before the session closed.
//!
//! When the ssh process exits during login, its last words usually say why.
//! These checks turn the common ones into a specific error before the
//! generic authentication failure is raised.

use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::error::{Result, TransportError};

static THEIR_OFFER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i-u)their offer: ([a-z0-9\-,]*)").ok());

static BAD_OPTION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i-u)bad configuration option: ([a-z0-9+=,]*)").ok());

/// Inspect `output` for a known ssh client failure message.
///
/// Returns `Ok(())` when nothing recognizable was found.
pub fn ssh_message_handler(host: &str, output: &[u8]) -> Result<()> {
    let lowered = output.to_ascii_lowercase();
    let has = |needle: &str| memchr::memmem::find(&lowered, needle.as_bytes()).is_some();

    if has("host key verification failed") {
        return Err(
            TransportError::auth_failed(format!("Host key verification failed for host {host}"))
                .into(),
        );
    }

    if has("operation timed out") || has("connection timed out") {
        return Err(
            TransportError::not_opened(format!("Timed out connecting to host {host}")).into(),
        );
    }

    if has("no route to host") {
        return Err(TransportError::not_opened(format!("No route to host {host}")).into());
    }

    if has("no matching key exchange") {
        let mut msg = format!("No matching key exchange found for host {host}");
        if let Some(offer) = capture(&THEIR_OFFER, output) {
            msg.push_str(&format!(", their offer: {offer}"));
        }
        return Err(TransportError::not_opened(msg).into());
    }

    if has("no matching cipher") {
        let mut msg = format!("No matching cipher found for host {host}");
        if let Some(offer) = capture(&THEIR_OFFER, output) {
            msg.push_str(&format!(", their offer: {offer}"));
        }
        return Err(TransportError::not_opened(msg).into());
    }

    if has("bad configuration") {
        let mut msg = format!("Bad SSH configuration option(s) for host {host}");
        if let Some(option) = capture(&BAD_OPTION, output) {
            msg.push_str(&format!(", bad option(s): {option}"));
        }
        return Err(TransportError::not_opened(msg).into());
    }

    // Matched case-sensitively, as printed by OpenSSH
    if memchr::memmem::find(output, b"WARNING: UNPROTECTED PRIVATE KEY FILE!").is_some() {
        return Err(TransportError::auth_failed(
            "Permissions for private key are too open, authentication failed!",
        )
        .into());
    }

    if has("could not resolve hostname") {
        return Err(
            TransportError::not_opened(format!("Could not resolve address for host {host}"))
                .into(),
        );
    }

    if has("permission denied") {
        return Err(TransportError::auth_failed(String::from_utf8_lossy(output)).into());
    }

    Ok(())
}

fn capture(pattern: &LazyLock<Option<Regex>>, output: &[u8]) -> Option<String> {
    let caps = pattern.as_ref()?.captures(output)?;
    let group = caps.get(1)?;
    Some(String::from_utf8_lossy(group.as_bytes()).into_owned())
}
