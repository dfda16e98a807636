//! tidepool-core: session I/O bridge for an in-browser code playground.
//!
//! Mediates byte-level communication between a host UI and an opaque
//! execution engine across repeated run/reset cycles: a pull-based stdin
//! cursor, two push-based output accumulators, and a controller that owns
//! readiness gating, the run lifecycle, and fault containment.

pub mod config;
pub mod controller;
pub mod engine;
pub mod io;
pub mod session;

// Re-export commonly used items at crate root.
pub use config::{ConfigError, PlaygroundConfig};
pub use controller::{HostIo, NullHostIo, RunOutcome, RunRequest, SessionController};
pub use engine::{Engine, EngineFault, EngineIo};
pub use io::{InputCursor, OutputChannel, OutputRouter};
pub use session::{Session, SessionState};
