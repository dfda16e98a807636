//! The session controller: readiness gating, the run/reset lifecycle, and
//! fault containment around the synchronous engine invocation.

use tracing::{debug, info};

use crate::config::PlaygroundConfig;
use crate::engine::{Engine, EngineIo};
use crate::io::OutputChannel;
use crate::session::{Session, SessionState};

/// Host-side effects the bridge triggers during a run. Implemented by the
/// UI collaborator: in the browser this fans out to the output panes and
/// the engine's virtual filesystem.
pub trait HostIo {
    /// Mirror a just-appended output byte to the display for its channel.
    fn display_write(&mut self, channel: OutputChannel, byte: u8);

    /// Publish the run's stdin bytes under a named file-like resource, for
    /// engines that read input via file access instead of the pull callback.
    fn publish_input(&mut self, name: &str, bytes: &[u8]);
}

/// A `HostIo` that discards everything. For tests and headless runs.
#[derive(Debug, Default)]
pub struct NullHostIo;

impl HostIo for NullHostIo {
    fn display_write(&mut self, _channel: OutputChannel, _byte: u8) {}
    fn publish_input(&mut self, _name: &str, _bytes: &[u8]) {}
}

/// The payload of one Run action from the UI: the current source text and
/// the current stdin text. The bridge consumes only the stdin text; the
/// source is recorded on the session for state queries.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source: String,
    pub stdin: String,
}

impl RunRequest {
    pub fn new(source: impl Into<String>, stdin: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            stdin: stdin.into(),
        }
    }
}

/// What became of a run request. Rejections are outcomes, not errors: they
/// mutate nothing and never invoke the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The engine ran to completion.
    Completed,
    /// The engine faulted; the message is also appended to stderr.
    Faulted { message: String },
    /// Run requested before the engine's readiness signal.
    RejectedUninitialized,
    /// Run requested while another run is in progress.
    RejectedBusy,
}

/// Owns the session and mediates every byte between the host UI and the
/// engine. The engine never touches the session directly, only the narrow
/// pull/push callbacks.
pub struct SessionController {
    session: Session,
    host: Box<dyn HostIo>,
    input_resource: String,
}

impl SessionController {
    pub fn new(config: &PlaygroundConfig, host: Box<dyn HostIo>) -> Self {
        Self {
            session: Session::new(),
            host,
            input_resource: config.input_resource.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Consume the engine's one-time readiness signal. Unlocks the session
    /// exactly once; returns false (and changes nothing) on later calls.
    pub fn mark_engine_ready(&mut self) -> bool {
        if self.session.state() != SessionState::Uninitialized {
            return false;
        }
        self.session.set_state(SessionState::Ready);
        info!("engine ready, session unlocked");
        true
    }

    /// Run the engine over fresh input.
    ///
    /// Resets the session (cursor to zero, input buffer replaced, both
    /// accumulators cleared), publishes the stdin bytes under the named
    /// input resource, then invokes the engine synchronously. On return or
    /// fault the session goes back to ready and stays usable; a fault's
    /// message is appended to stderr through the display-visible path.
    pub fn run(&mut self, engine: &mut dyn Engine, request: RunRequest) -> RunOutcome {
        match self.session.state() {
            SessionState::Uninitialized => {
                debug!("run rejected: engine not ready");
                return RunOutcome::RejectedUninitialized;
            }
            SessionState::Running => {
                debug!("run rejected: a run is already in progress");
                return RunOutcome::RejectedBusy;
            }
            SessionState::Ready => {}
        }

        self.session.set_state(SessionState::Running);
        self.session.reset_for_run(request.source, request.stdin);
        self.host
            .publish_input(&self.input_resource, self.session.input_bytes());
        debug!(
            engine = engine.name(),
            input_len = self.session.input_len(),
            "starting run"
        );

        let result = {
            let mut io = ControllerIo { ctrl: self };
            engine.exec(&mut io)
        };

        let outcome = match result {
            Ok(()) => {
                debug!(
                    stdout_len = self.session.stdout_bytes().len(),
                    stderr_len = self.session.stderr_bytes().len(),
                    "run completed"
                );
                RunOutcome::Completed
            }
            Err(fault) => {
                let message = fault.message().to_string();
                for byte in message.bytes() {
                    self.push_stderr(byte);
                }
                info!(%message, "engine faulted, session recovered");
                RunOutcome::Faulted { message }
            }
        };

        self.session.set_state(SessionState::Ready);
        outcome
    }

    /// Next stdin byte for the engine, or `None` at end of stream. Outside
    /// a run this is a guarded no-op that leaves the cursor untouched.
    pub fn pull_stdin(&mut self) -> Option<u8> {
        if self.session.state() != SessionState::Running {
            return None;
        }
        self.session.input_mut().next_byte()
    }

    /// Append one engine-emitted byte to stdout and mirror it to the display.
    pub fn push_stdout(&mut self, byte: u8) {
        self.push_output(OutputChannel::Stdout, byte);
    }

    /// Append one engine-emitted byte to stderr and mirror it to the display.
    pub fn push_stderr(&mut self, byte: u8) {
        self.push_output(OutputChannel::Stderr, byte);
    }

    fn push_output(&mut self, channel: OutputChannel, byte: u8) {
        if self.session.state() != SessionState::Running {
            return;
        }
        self.session.outputs_mut().write(channel, byte);
        self.host.display_write(channel, byte);
    }
}

/// Adapter handing the controller's guarded callbacks to an in-process
/// engine as its `EngineIo` surface.
struct ControllerIo<'a> {
    ctrl: &'a mut SessionController,
}

impl EngineIo for ControllerIo<'_> {
    fn pull_stdin(&mut self) -> Option<u8> {
        self.ctrl.pull_stdin()
    }

    fn push_stdout(&mut self, byte: u8) {
        self.ctrl.push_stdout(byte);
    }

    fn push_stderr(&mut self, byte: u8) {
        self.ctrl.push_stderr(byte);
    }
}
