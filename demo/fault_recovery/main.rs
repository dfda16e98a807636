//! # Scenario 2: Fault recovery
//!
//! A run that faults mid-stream: output produced before the fault stays,
//! the message lands on stderr, and the very next run works normally
//! without reloading anything.

use anyhow::Result;

use tidepool_core::config::PlaygroundConfig;
use tidepool_core::controller::{NullHostIo, RunRequest, SessionController};
use tidepool_core::engine::mock::{EchoEngine, FaultingEngine};

fn sep(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {title}");
    println!("{}\n", "=".repeat(60));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("==========================================================");
    println!("  SCENARIO 2: Fault recovery");
    println!("  The session survives an engine crash");
    println!("==========================================================");

    let config = PlaygroundConfig::default();
    let mut controller = SessionController::new(&config, Box::new(NullHostIo));
    controller.mark_engine_ready();

    // ── Faulting run ────────────────────────────────────────────
    sep("Engine emits \"AB\", then hits a runtime fault");
    let mut faulty = FaultingEngine::new("memory access out of bounds").with_stdout_prefix(b"AB");
    let outcome = controller.run(&mut faulty, RunRequest::new("", "ignored"));
    println!("outcome: {outcome:?}");
    println!("stdout kept: {:?}", controller.session().stdout_text());
    println!("stderr:      {:?}", controller.session().stderr_text());
    println!("state:       {:?}", controller.session().state());

    // ── Recovery run ────────────────────────────────────────────
    sep("Next run starts from a clean slate");
    let outcome = controller.run(&mut EchoEngine::new(), RunRequest::new("", "all is well"));
    println!("outcome: {outcome:?}");
    println!("stdout: {:?}", controller.session().stdout_text());
    println!("stderr: {:?}", controller.session().stderr_text());

    Ok(())
}
