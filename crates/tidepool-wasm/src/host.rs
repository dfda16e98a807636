//! Host imports — functions provided by the JS runtime to the WASM module.
//!
//! On wasm32 targets, these are real extern "C" imports from the host.
//! On native targets (for testing), they are no-op stubs.

use tidepool_core::engine::EngineFault;
use tidepool_core::io::OutputChannel;

#[cfg(target_arch = "wasm32")]
mod ffi {
    unsafe extern "C" {
        pub fn host_log(level: i32, msg_ptr: *const u8, msg_len: u32);
        pub fn host_display_write(channel: i32, byte: u32);
        pub fn host_publish_input(
            name_ptr: *const u8,
            name_len: u32,
            data_ptr: *const u8,
            data_len: u32,
        );
        pub fn host_engine_exec(fault_ptr: *mut u8, fault_cap: u32) -> u32;
        pub fn host_emit_event(
            topic_ptr: *const u8,
            topic_len: u32,
            payload_ptr: *const u8,
            payload_len: u32,
        );
    }
}

/// Well-known lifecycle event topics emitted to the UI.
pub mod topics {
    pub const ENGINE_READY: &str = "engine.ready";
    pub const RUN_COMPLETED: &str = "run.completed";
    pub const RUN_FAULTED: &str = "run.faulted";
}

/// Channel codes on the wire, fd-style.
fn channel_code(channel: OutputChannel) -> i32 {
    match channel {
        OutputChannel::Stdout => 1,
        OutputChannel::Stderr => 2,
    }
}

/// Cap on the fault message the host may hand back from a failed run.
#[cfg(target_arch = "wasm32")]
const FAULT_BUF_CAP: usize = 16 * 1024;

/// Safe wrapper: log a string at a given level.
pub fn log(level: i32, msg: &str) {
    #[cfg(target_arch = "wasm32")]
    unsafe {
        ffi::host_log(level, msg.as_ptr(), msg.len() as u32);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (level, msg);
    }
}

/// Safe wrapper: mirror one output byte to the display pane for a channel.
pub fn display_write(channel: OutputChannel, byte: u8) {
    #[cfg(target_arch = "wasm32")]
    unsafe {
        ffi::host_display_write(channel_code(channel), byte as u32);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (channel_code(channel), byte);
    }
}

/// Safe wrapper: publish the stdin bytes under a named file-like resource.
pub fn publish_input(name: &str, bytes: &[u8]) {
    #[cfg(target_arch = "wasm32")]
    unsafe {
        ffi::host_publish_input(
            name.as_ptr(),
            name.len() as u32,
            bytes.as_ptr(),
            bytes.len() as u32,
        );
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (name, bytes);
    }
}

/// Safe wrapper: invoke the engine module's synchronous entry point.
///
/// The JS side wraps the call in try/catch; a clean return yields 0, a
/// caught fault writes its message into the provided buffer and returns
/// the message's byte length.
pub fn engine_exec() -> Result<(), EngineFault> {
    #[cfg(target_arch = "wasm32")]
    {
        let mut buf = vec![0u8; FAULT_BUF_CAP];
        let len = unsafe { ffi::host_engine_exec(buf.as_mut_ptr(), buf.len() as u32) } as usize;
        if len == 0 {
            Ok(())
        } else {
            let len = len.min(buf.len());
            Err(EngineFault::new(String::from_utf8_lossy(&buf[..len])))
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Ok(())
    }
}

/// Safe wrapper: emit a lifecycle event.
pub fn emit_event(topic: &str, payload: &str) {
    #[cfg(target_arch = "wasm32")]
    unsafe {
        ffi::host_emit_event(
            topic.as_ptr(),
            topic.len() as u32,
            payload.as_ptr(),
            payload.len() as u32,
        );
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (topic, payload);
    }
}
