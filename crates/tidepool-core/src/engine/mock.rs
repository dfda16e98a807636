//! Bundled engines for demos and tests.

use super::*;

/// Echoes every pulled stdin byte to stdout until end of stream. This is
/// the sample playground workload: the input pane holds the program text
/// and the engine streams it back into the code display.
#[derive(Debug, Default)]
pub struct EchoEngine;

impl EchoEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for EchoEngine {
    fn name(&self) -> &str {
        "echo"
    }

    fn exec(&mut self, io: &mut dyn EngineIo) -> Result<(), EngineFault> {
        while let Some(byte) = io.pull_stdin() {
            io.push_stdout(byte);
        }
        Ok(())
    }
}

/// Emits a configured stdout prefix, then faults with a configured message.
#[derive(Debug)]
pub struct FaultingEngine {
    prefix: Vec<u8>,
    message: String,
}

impl FaultingEngine {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            prefix: Vec::new(),
            message: message.into(),
        }
    }

    pub fn with_stdout_prefix(mut self, bytes: &[u8]) -> Self {
        self.prefix = bytes.to_vec();
        self
    }
}

impl Engine for FaultingEngine {
    fn name(&self) -> &str {
        "faulting"
    }

    fn exec(&mut self, io: &mut dyn EngineIo) -> Result<(), EngineFault> {
        for byte in &self.prefix {
            io.push_stdout(*byte);
        }
        Err(EngineFault::new(&self.message))
    }
}

/// One I/O action of a scripted run.
#[derive(Debug, Clone, Copy)]
pub enum ScriptOp {
    PullStdin,
    PushStdout(u8),
    PushStderr(u8),
}

/// Replays an explicit list of I/O actions in order. Useful for asserting
/// byte-for-byte output ordering and cross-channel interleaving.
#[derive(Debug)]
pub struct ScriptedEngine {
    ops: Vec<ScriptOp>,
}

impl ScriptedEngine {
    pub fn new(ops: Vec<ScriptOp>) -> Self {
        Self { ops }
    }
}

impl Engine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn exec(&mut self, io: &mut dyn EngineIo) -> Result<(), EngineFault> {
        for op in &self.ops {
            match op {
                ScriptOp::PullStdin => {
                    io.pull_stdin();
                }
                ScriptOp::PushStdout(byte) => io.push_stdout(*byte),
                ScriptOp::PushStderr(byte) => io.push_stderr(*byte),
            }
        }
        Ok(())
    }
}
