//! Output accumulator for the login dialogue.
//!
//! Unlike a prompt buffer for CLI scraping, nothing is stripped or rewritten
//! here: whatever follows the last password prompt is the start of the
//! server's NETCONF greeting and is handed to the capability parser as-is.

use bytes::{Bytes, BytesMut};
use memchr::memmem;

/// Growable buffer holding every byte read since the last reset.
///
/// An ASCII-lower-cased copy is kept in step with the stored bytes so a
/// scan never has to re-fold the whole buffer.
#[derive(Debug, Default)]
pub struct OutputAccumulator {
    buffer: BytesMut,
    folded: BytesMut,
}

impl OutputAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            folded: BytesMut::with_capacity(4096),
        }
    }

    /// Append bytes in receipt order.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.folded.extend(data.iter().map(u8::to_ascii_lowercase));
    }

    /// Check for `needle` anywhere in the buffer, ignoring ASCII case.
    ///
    /// `needle` must already be lower case.
    pub fn contains_ignore_ascii_case(&self, needle: &[u8]) -> bool {
        debug_assert!(!needle.iter().any(u8::is_ascii_uppercase));
        memmem::find(&self.folded, needle).is_some()
    }

    /// Drop everything accumulated so far.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.folded.clear();
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Bytes {
        self.folded.clear();
        self.buffer.split().freeze()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_keeps_bytes_verbatim() {
        let mut acc = OutputAccumulator::new();
        acc.extend(b"\x1b[32mbanner\x1b[0m\r\n");
        acc.extend(b"<hello");
        assert_eq!(acc.as_slice(), b"\x1b[32mbanner\x1b[0m\r\n<hello");
    }

    #[test]
    fn test_contains_ignores_case() {
        let mut acc = OutputAccumulator::new();
        acc.extend(b"admin@router's PASSWORD: ");
        assert!(acc.contains_ignore_ascii_case(b"password:"));
        assert!(!acc.contains_ignore_ascii_case(b"<hello"));
        // Scan does not modify the stored bytes
        assert_eq!(acc.as_slice(), b"admin@router's PASSWORD: ");
    }

    #[test]
    fn test_match_across_chunks() {
        let mut acc = OutputAccumulator::new();
        acc.extend(b"Pass");
        assert!(!acc.contains_ignore_ascii_case(b"password:"));
        acc.extend(b"word:");
        assert!(acc.contains_ignore_ascii_case(b"password:"));
    }

    #[test]
    fn test_take_resets() {
        let mut acc = OutputAccumulator::new();
        acc.extend(b"<hello xmlns=\"urn\">");
        assert_eq!(&acc.take()[..], b"<hello xmlns=\"urn\">");
        assert!(acc.is_empty());

        acc.extend(b"more");
        acc.reset();
        assert_eq!(acc.len(), 0);
    }

    #[test]
    fn test_scan_forgets_reset_and_taken_bytes() {
        let mut acc = OutputAccumulator::new();
        acc.extend(b"Password:");
        acc.reset();
        assert!(!acc.contains_ignore_ascii_case(b"password:"));

        acc.extend(b"<HELLO");
        let _ = acc.take();
        assert!(!acc.contains_ignore_ascii_case(b"<hello"));

        // Only the prefix before the reset could have completed the match
        acc.extend(b"Pass");
        acc.reset();
        acc.extend(b"word:");
        assert!(!acc.contains_ignore_ascii_case(b"password:"));
    }

    #[test]
    fn test_long_banner_scan() {
        let mut acc = OutputAccumulator::new();
        for _ in 0..2_000 {
            acc.extend(b"Authorized Use Only. ");
            assert!(!acc.contains_ignore_ascii_case(b"password:"));
        }
        acc.extend(b"admin@router's Password: ");
        assert!(acc.contains_ignore_ascii_case(b"password:"));
        assert!(acc.as_slice().starts_with(b"Authorized Use Only. "));
    }
}
