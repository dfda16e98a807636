//! # Scenario 1: Echo session
//!
//! Drives the session bridge against the bundled echo engine: readiness
//! gating, one run, then a second run proving the reset leaves nothing
//! behind from the first.

use anyhow::Result;

use tidepool_core::config::PlaygroundConfig;
use tidepool_core::controller::{HostIo, RunRequest, SessionController};
use tidepool_core::engine::mock::EchoEngine;
use tidepool_core::io::OutputChannel;

/// Streams every display byte straight to the terminal, the way the
/// browser host streams them into the output panes.
struct TerminalPanes;

impl HostIo for TerminalPanes {
    fn display_write(&mut self, channel: OutputChannel, byte: u8) {
        let pane = match channel {
            OutputChannel::Stdout => "out",
            OutputChannel::Stderr => "err",
        };
        println!("[pane:{pane}] {:?}", byte as char);
    }

    fn publish_input(&mut self, name: &str, bytes: &[u8]) {
        println!("[fs] {name} <- {} bytes", bytes.len());
    }
}

fn sep(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {title}");
    println!("{}\n", "=".repeat(60));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("==========================================================");
    println!("  SCENARIO 1: Echo session");
    println!("  One engine, two runs, no residue");
    println!("==========================================================");

    let config = PlaygroundConfig::default();
    let mut controller = SessionController::new(&config, Box::new(TerminalPanes));
    let mut engine = EchoEngine::new();

    // ── Before readiness ────────────────────────────────────────
    sep("Run requested before the engine is ready");
    let outcome = controller.run(&mut engine, RunRequest::new("", "too early"));
    println!("outcome: {outcome:?}");
    println!("session untouched: input_len = {}", controller.session().input_len());

    // ── Readiness signal ────────────────────────────────────────
    sep("Engine bootstrap fires the readiness signal");
    println!("unlocked: {}", controller.mark_engine_ready());
    println!("fires only once: {}", controller.mark_engine_ready());

    // ── First run ───────────────────────────────────────────────
    sep("First run: echo \"AB\"");
    let outcome = controller.run(&mut engine, RunRequest::new("", "AB"));
    println!("outcome: {outcome:?}");
    println!("stdout: {:?}", controller.session().stdout_text());
    println!("stderr: {:?}", controller.session().stderr_text());
    println!("cursor: {} / {}", controller.session().cursor_pos(), controller.session().input_len());

    // ── Second run ──────────────────────────────────────────────
    sep("Second run: fresh input, cleared accumulators");
    let outcome = controller.run(&mut engine, RunRequest::new("", "tide pool"));
    println!("outcome: {outcome:?}");
    println!("stdout: {:?}", controller.session().stdout_text());

    Ok(())
}
