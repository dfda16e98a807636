mod host;
mod state;

use tidepool_core::controller::{RunOutcome, RunRequest};
use tidepool_core::PlaygroundConfig;

use crate::host::topics;

// ── Helper: read string from WASM memory ─────────────────────────────

fn read_str(ptr: *const u8, len: u32) -> Option<&'static str> {
    let bytes = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    std::str::from_utf8(bytes).ok()
}

fn write_to_buffer(s: &str, out_ptr: *mut u8, max_len: u32) -> u32 {
    let bytes = s.as_bytes();
    let copy_len = bytes.len().min(max_len as usize);
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), out_ptr, copy_len);
    }
    copy_len as u32
}

// ── LIFECYCLE EXPORTS ────────────────────────────────────────────────

/// Initialize the session bridge with a JSON config.
/// Returns 0 on success, negative on error.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_init(config_ptr: *const u8, config_len: u32) -> i32 {
    let config_str = match read_str(config_ptr, config_len) {
        Some(s) => s,
        None => return -1,
    };

    let config = match PlaygroundConfig::from_json(config_str) {
        Ok(c) => c,
        Err(_) => return -2,
    };

    if config.validate().is_err() {
        return -3;
    }

    state::init(config);

    host::log(2, "tidepool: bridge initialized");
    0
}

/// Consume the engine bootstrap's one-time readiness signal.
/// Returns 1 if the session was unlocked, 0 if the signal already fired.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_engine_ready() -> i32 {
    let rt = state::get();
    if rt.controller.mark_engine_ready() {
        host::emit_event(topics::ENGINE_READY, "");
        1
    } else {
        0
    }
}

// ── MEMORY MANAGEMENT ────────────────────────────────────────────────

/// Allocate memory in WASM linear memory (for host to write into).
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_alloc(size: u32) -> *mut u8 {
    let layout = std::alloc::Layout::from_size_align(size as usize, 1).unwrap();
    unsafe { std::alloc::alloc(layout) }
}

/// Deallocate memory in WASM linear memory.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_dealloc(ptr: *mut u8, size: u32) {
    let layout = std::alloc::Layout::from_size_align(size as usize, 1).unwrap();
    unsafe { std::alloc::dealloc(ptr, layout) }
}

// ── RUN CONTROL ──────────────────────────────────────────────────────

/// Run the engine over the given source and stdin text.
/// Returns: 0=completed, 1=faulted, -1=bad UTF-8, -2=engine not ready yet,
/// -3=a run is already in progress.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_run(
    source_ptr: *const u8,
    source_len: u32,
    stdin_ptr: *const u8,
    stdin_len: u32,
) -> i32 {
    let source = match read_str(source_ptr, source_len) {
        Some(s) => s,
        None => return -1,
    };
    let stdin = match read_str(stdin_ptr, stdin_len) {
        Some(s) => s,
        None => return -1,
    };

    let rt = state::get();
    match rt
        .controller
        .run(&mut rt.engine, RunRequest::new(source, stdin))
    {
        RunOutcome::Completed => {
            host::emit_event(topics::RUN_COMPLETED, "");
            0
        }
        RunOutcome::Faulted { message } => {
            host::emit_event(topics::RUN_FAULTED, &message);
            1
        }
        RunOutcome::RejectedUninitialized => -2,
        RunOutcome::RejectedBusy => -3,
    }
}

// ── ENGINE CALLBACKS ─────────────────────────────────────────────────
// Invoked by the engine module (through the JS glue) while a run is in
// flight. Outside a run they are inert.

/// Pull the next stdin byte. Returns the byte, or -1 at end of stream.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_pull_stdin() -> i32 {
    match state::get().controller.pull_stdin() {
        Some(byte) => byte as i32,
        None => -1,
    }
}

/// Push one byte of engine stdout.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_push_stdout(byte: u32) {
    state::get().controller.push_stdout(byte as u8);
}

/// Push one byte of engine stderr.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_push_stderr(byte: u32) {
    state::get().controller.push_stderr(byte as u8);
}

// ── QUERY ────────────────────────────────────────────────────────────

/// Copy the accumulated stdout text into a host buffer. Returns bytes written.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_stdout(out_ptr: *mut u8, max_len: u32) -> u32 {
    let rt = state::get();
    write_to_buffer(&rt.controller.session().stdout_text(), out_ptr, max_len)
}

/// Copy the accumulated stderr text into a host buffer. Returns bytes written.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_stderr(out_ptr: *mut u8, max_len: u32) -> u32 {
    let rt = state::get();
    write_to_buffer(&rt.controller.session().stderr_text(), out_ptr, max_len)
}

/// Get the session's current state as a JSON string. Returns bytes written.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_state(out_ptr: *mut u8, max_len: u32) -> u32 {
    let session = state::get().controller.session();
    let snapshot = serde_json::json!({
        "state": session.state(),
        "cursor": session.cursor_pos(),
        "input_len": session.input_len(),
        "stdout_len": session.stdout_bytes().len(),
        "stderr_len": session.stderr_bytes().len(),
    });
    write_to_buffer(&snapshot.to_string(), out_ptr, max_len)
}

/// Copy the sample program for the stdin pane into a host buffer.
/// Returns bytes written.
#[unsafe(no_mangle)]
pub extern "C" fn tidepool_sample_stdin(out_ptr: *mut u8, max_len: u32) -> u32 {
    write_to_buffer(&state::get().sample_stdin, out_ptr, max_len)
}

// ── TESTS ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // The runtime singleton is process-global; serialize tests touching it.
    fn lock() -> std::sync::MutexGuard<'static, ()> {
        static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
        TEST_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn init_default() {
        let config = b"{}";
        assert_eq!(tidepool_init(config.as_ptr(), config.len() as u32), 0);
    }

    fn read_export(export: extern "C" fn(*mut u8, u32) -> u32) -> String {
        let mut buf = vec![0u8; 4096];
        let n = export(buf.as_mut_ptr(), buf.len() as u32) as usize;
        String::from_utf8_lossy(&buf[..n]).into_owned()
    }

    #[test]
    fn test_init_valid_config() {
        let _guard = lock();
        init_default();
    }

    #[test]
    fn test_init_invalid_json() {
        let _guard = lock();
        let config = b"not json";
        assert_eq!(tidepool_init(config.as_ptr(), config.len() as u32), -2);
    }

    #[test]
    fn test_init_invalid_utf8() {
        let _guard = lock();
        let config: &[u8] = &[0xFF, 0xFE];
        assert_eq!(tidepool_init(config.as_ptr(), config.len() as u32), -1);
    }

    #[test]
    fn test_init_rejects_invalid_config() {
        let _guard = lock();
        let config = br#"{"input_resource": "relative.txt"}"#;
        assert_eq!(tidepool_init(config.as_ptr(), config.len() as u32), -3);
    }

    #[test]
    fn test_alloc_dealloc() {
        let ptr = tidepool_alloc(1024);
        assert!(!ptr.is_null());
        unsafe {
            std::ptr::write(ptr, 42u8);
            assert_eq!(std::ptr::read(ptr), 42u8);
        }
        tidepool_dealloc(ptr, 1024);
    }

    #[test]
    fn test_run_is_gated_until_engine_ready() {
        let _guard = lock();
        init_default();

        let stdin = b"AB";
        let premature = tidepool_run(stdin.as_ptr(), 0, stdin.as_ptr(), stdin.len() as u32);
        assert_eq!(premature, -2);

        assert_eq!(tidepool_engine_ready(), 1);
        assert_eq!(tidepool_engine_ready(), 0);

        let outcome = tidepool_run(stdin.as_ptr(), 0, stdin.as_ptr(), stdin.len() as u32);
        assert_eq!(outcome, 0);

        let snapshot = read_export(tidepool_state);
        assert!(snapshot.contains("\"state\":\"ready\""));
        assert!(snapshot.contains("\"input_len\":2"));
    }

    #[test]
    fn test_callbacks_are_inert_between_runs() {
        let _guard = lock();
        init_default();
        tidepool_engine_ready();

        assert_eq!(tidepool_pull_stdin(), -1);
        tidepool_push_stdout(b'x' as u32);
        tidepool_push_stderr(b'y' as u32);

        assert_eq!(read_export(tidepool_stdout), "");
        assert_eq!(read_export(tidepool_stderr), "");
    }

    #[test]
    fn test_run_rejects_invalid_utf8_stdin() {
        let _guard = lock();
        init_default();
        tidepool_engine_ready();

        let bad: &[u8] = &[0xFF];
        assert_eq!(tidepool_run(bad.as_ptr(), 0, bad.as_ptr(), 1), -1);
    }

    #[test]
    fn test_sample_stdin_is_exposed() {
        let _guard = lock();
        init_default();

        let sample = read_export(tidepool_sample_stdin);
        assert!(sample.contains("print_char!"));
    }

    #[test]
    fn test_state_snapshot_shape() {
        let _guard = lock();
        init_default();

        let snapshot = read_export(tidepool_state);
        for field in ["state", "cursor", "input_len", "stdout_len", "stderr_len"] {
            assert!(snapshot.contains(field), "missing field {field}");
        }
        assert!(snapshot.contains("uninitialized"));
    }
}
