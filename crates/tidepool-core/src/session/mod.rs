//! The in-memory session: one per process, reused across runs.

use serde::{Deserialize, Serialize};

use crate::io::{InputCursor, OutputChannel, OutputRouter};

/// Where the session is in its lifecycle.
///
/// `Uninitialized` until the engine's one-time readiness signal, `Ready`
/// between runs, `Running` while the engine executes. There is no terminal
/// state; the machine cycles for the life of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Uninitialized,
    Ready,
    Running,
}

/// The bundle of input buffer, cursor, and output accumulators scoped to
/// one run-reset cycle. Created once at process start and mutated in place
/// by the controller; never recreated while the page lives.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    source: String,
    input: InputCursor,
    outputs: OutputRouter,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            source: String::new(),
            input: InputCursor::new(),
            outputs: OutputRouter::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Apply the per-run reset: rewind the cursor onto the new stdin text,
    /// clear both accumulators, and record the submitted source text.
    pub(crate) fn reset_for_run(&mut self, source: String, stdin: String) {
        self.input.load(stdin.into_bytes());
        self.outputs.clear();
        self.source = source;
    }

    pub(crate) fn input_mut(&mut self) -> &mut InputCursor {
        &mut self.input
    }

    pub(crate) fn outputs_mut(&mut self) -> &mut OutputRouter {
        &mut self.outputs
    }

    /// The source text submitted with the most recent run. The bridge does
    /// not consume it; it is kept for UI state queries.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn input_bytes(&self) -> &[u8] {
        self.input.bytes()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn cursor_pos(&self) -> usize {
        self.input.pos()
    }

    pub fn stdout_bytes(&self) -> &[u8] {
        self.outputs.bytes(OutputChannel::Stdout)
    }

    pub fn stderr_bytes(&self) -> &[u8] {
        self.outputs.bytes(OutputChannel::Stderr)
    }

    pub fn stdout_text(&self) -> String {
        self.outputs.text(OutputChannel::Stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        self.outputs.text(OutputChannel::Stderr).into_owned()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_starts_uninitialized_and_empty() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(session.input_len(), 0);
        assert!(session.stdout_bytes().is_empty());
        assert!(session.stderr_bytes().is_empty());
        assert_eq!(session.source(), "");
    }

    #[test]
    fn test_reset_for_run_replaces_input_and_clears_output() {
        let mut session = Session::new();
        session.reset_for_run("src one".to_string(), "first".to_string());
        session.outputs_mut().write(OutputChannel::Stdout, b'x');
        session.outputs_mut().write(OutputChannel::Stderr, b'y');
        session.input_mut().next_byte();

        session.reset_for_run("src two".to_string(), "second".to_string());
        assert_eq!(session.cursor_pos(), 0);
        assert_eq!(session.input_bytes(), b"second");
        assert!(session.stdout_bytes().is_empty());
        assert!(session.stderr_bytes().is_empty());
        assert_eq!(session.source(), "src two");
    }

    #[test]
    fn test_text_accessors_decode_accumulated_bytes() {
        let mut session = Session::new();
        session.reset_for_run(String::new(), String::new());
        for byte in b"out" {
            session.outputs_mut().write(OutputChannel::Stdout, *byte);
        }
        for byte in b"err" {
            session.outputs_mut().write(OutputChannel::Stderr, *byte);
        }
        assert_eq!(session.stdout_text(), "out");
        assert_eq!(session.stderr_text(), "err");
    }
}
