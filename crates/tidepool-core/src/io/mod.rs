//! Byte-level I/O primitives for one run: the pull-based stdin cursor and
//! the two push-based output accumulators.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// The two output sinks an engine can push bytes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    Stdout,
    Stderr,
}

/// Pull-based stdin provider. Hands out one byte per call from the current
/// input buffer and keeps returning `None` once the buffer is exhausted.
#[derive(Debug, Default)]
pub struct InputCursor {
    bytes: Vec<u8>,
    pos: usize,
}

impl InputCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer wholesale and rewind the cursor to the start.
    pub fn load(&mut self, bytes: Vec<u8>) {
        self.bytes = bytes;
        self.pos = 0;
    }

    /// Next input byte, or `None` at end of stream. Calling again past the
    /// end keeps returning `None`; the cursor never moves backwards.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Push-based stdout/stderr sinks. Appends every byte to the accumulator
/// for its channel, preserving arrival order within a channel.
#[derive(Debug, Default)]
pub struct OutputRouter {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl OutputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte to the named channel's accumulator.
    pub fn write(&mut self, channel: OutputChannel, byte: u8) {
        match channel {
            OutputChannel::Stdout => self.stdout.push(byte),
            OutputChannel::Stderr => self.stderr.push(byte),
        }
    }

    /// Clear both accumulators.
    pub fn clear(&mut self) {
        self.stdout.clear();
        self.stderr.clear();
    }

    pub fn bytes(&self, channel: OutputChannel) -> &[u8] {
        match channel {
            OutputChannel::Stdout => &self.stdout,
            OutputChannel::Stderr => &self.stderr,
        }
    }

    /// Accumulated text for a channel. Output is a raw byte stream; decoding
    /// is lossy and happens only at this display boundary.
    pub fn text(&self, channel: OutputChannel) -> Cow<'_, str> {
        String::from_utf8_lossy(self.bytes(channel))
    }

    pub fn len(&self, channel: OutputChannel) -> usize {
        self.bytes(channel).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_pulls_bytes_in_order() {
        let mut cursor = InputCursor::new();
        cursor.load(b"AB".to_vec());

        assert_eq!(cursor.next_byte(), Some(b'A'));
        assert_eq!(cursor.pos(), 1);
        assert_eq!(cursor.next_byte(), Some(b'B'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.next_byte(), None);
    }

    #[test]
    fn test_cursor_end_of_stream_is_idempotent() {
        let mut cursor = InputCursor::new();
        cursor.load(b"x".to_vec());

        assert_eq!(cursor.next_byte(), Some(b'x'));
        for _ in 0..5 {
            assert_eq!(cursor.next_byte(), None);
        }
        assert_eq!(cursor.pos(), 1);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_cursor_empty_buffer_is_immediately_exhausted() {
        let mut cursor = InputCursor::new();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next_byte(), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_cursor_pos_never_exceeds_len() {
        let mut cursor = InputCursor::new();
        cursor.load(b"abc".to_vec());

        let mut last = 0;
        for _ in 0..10 {
            cursor.next_byte();
            assert!(cursor.pos() >= last);
            assert!(cursor.pos() <= cursor.len());
            last = cursor.pos();
        }
        assert_eq!(cursor.pos(), 3);
    }

    #[test]
    fn test_cursor_load_rewinds() {
        let mut cursor = InputCursor::new();
        cursor.load(b"first".to_vec());
        while cursor.next_byte().is_some() {}

        cursor.load(b"second".to_vec());
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.next_byte(), Some(b's'));
    }

    #[test]
    fn test_cursor_forwards_multibyte_utf8_as_bytes() {
        let mut cursor = InputCursor::new();
        cursor.load("é".as_bytes().to_vec());

        assert_eq!(cursor.len(), 2);
        assert_eq!(cursor.next_byte(), Some(0xC3));
        assert_eq!(cursor.next_byte(), Some(0xA9));
        assert_eq!(cursor.next_byte(), None);
    }

    #[test]
    fn test_router_preserves_order_within_channel() {
        let mut router = OutputRouter::new();
        for byte in b"hello" {
            router.write(OutputChannel::Stdout, *byte);
        }
        assert_eq!(router.bytes(OutputChannel::Stdout), b"hello");
        assert_eq!(router.text(OutputChannel::Stdout), "hello");
    }

    #[test]
    fn test_router_channels_are_independent() {
        let mut router = OutputRouter::new();
        router.write(OutputChannel::Stdout, b'o');
        router.write(OutputChannel::Stderr, b'e');
        router.write(OutputChannel::Stdout, b'k');

        assert_eq!(router.bytes(OutputChannel::Stdout), b"ok");
        assert_eq!(router.bytes(OutputChannel::Stderr), b"e");
    }

    #[test]
    fn test_router_clear_empties_both_channels() {
        let mut router = OutputRouter::new();
        router.write(OutputChannel::Stdout, b'a');
        router.write(OutputChannel::Stderr, b'b');

        router.clear();
        assert!(router.bytes(OutputChannel::Stdout).is_empty());
        assert!(router.bytes(OutputChannel::Stderr).is_empty());
    }

    #[test]
    fn test_router_lossy_decode_of_invalid_utf8() {
        let mut router = OutputRouter::new();
        router.write(OutputChannel::Stderr, 0xFF);
        assert_eq!(router.text(OutputChannel::Stderr), "\u{FFFD}");
        assert_eq!(router.len(OutputChannel::Stderr), 1);
    }
}
