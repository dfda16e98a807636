//! Global WASM state — singleton runtime holding the session controller
//! and the handle to the external engine.
//!
//! WASM is single-threaded, so we use a raw pointer to avoid Rust 2024's
//! `static_mut_refs` restrictions. Access is always safe in single-threaded
//! WASM, including when the engine re-enters through the exported pull/push
//! callbacks while a run is in flight.

use tidepool_core::controller::{HostIo, SessionController};
use tidepool_core::engine::{Engine, EngineFault, EngineIo};
use tidepool_core::io::OutputChannel;
use tidepool_core::PlaygroundConfig;

use crate::host;

/// Bridges the controller's host effects to the JS imports.
pub struct JsHost;

impl HostIo for JsHost {
    fn display_write(&mut self, channel: OutputChannel, byte: u8) {
        host::display_write(channel, byte);
    }

    fn publish_input(&mut self, name: &str, bytes: &[u8]) {
        host::publish_input(name, bytes);
    }
}

/// The external engine module, reached through the host trampoline.
///
/// While `host_engine_exec` runs, the engine consumes input through the
/// exported pull/push callbacks (or the published input file) rather than
/// the in-process `EngineIo` handle, which therefore goes unused here.
pub struct JsEngine;

impl Engine for JsEngine {
    fn name(&self) -> &str {
        "wasm-engine"
    }

    fn exec(&mut self, _io: &mut dyn EngineIo) -> Result<(), EngineFault> {
        host::engine_exec()
    }
}

/// The complete runtime state.
pub struct Runtime {
    pub controller: SessionController,
    pub engine: JsEngine,
    /// Sample program offered to the UI for the stdin pane.
    pub sample_stdin: String,
}

/// Raw pointer to the heap-allocated runtime. WASM is single-threaded so
/// this is safe.
static mut RT_PTR: *mut Runtime = std::ptr::null_mut();

/// Initialize the global runtime. Replaces any existing runtime.
pub fn init(config: PlaygroundConfig) {
    let rt = Box::new(Runtime {
        controller: SessionController::new(&config, Box::new(JsHost)),
        engine: JsEngine,
        sample_stdin: config.sample_stdin,
    });
    unsafe {
        // Drop previous runtime if any
        if !RT_PTR.is_null() {
            drop(Box::from_raw(RT_PTR));
        }
        RT_PTR = Box::into_raw(rt);
    }
}

/// Get a mutable reference to the runtime. Panics if not initialized.
pub fn get() -> &'static mut Runtime {
    unsafe {
        if RT_PTR.is_null() {
            panic!("tidepool runtime not initialized — call tidepool_init first");
        }
        &mut *RT_PTR
    }
}
