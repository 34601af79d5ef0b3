use tilt_logger::{ConsoleTarget, LevelFilter, Logger, capture};

#[test]
fn stderr_console_has_no_file_writer_and_capture_still_works() {
    let logger = Logger::builder()
        .name("integration-console-stderr")
        .console_target(ConsoleTarget::Stderr)
        .level(LevelFilter::WARN)
        .init()
        .expect("logger should initialize");

    assert!(!logger.writes_files());

    // The thread-local capture overrides the global subscriber and its level.
    let ((), events) = capture::record(|| tracing::debug!(target: "tilt::catalog", "seen"));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].target, "tilt::catalog");
}
