use common::log_setup::setup_logging;

#[test]
fn test_setup_logging_installs_global_subscriber() {
    assert!(!tracing::dispatcher::has_been_set());

    setup_logging("info");

    assert!(tracing::dispatcher::has_been_set());
    assert!(tracing::enabled!(tracing::Level::ERROR));
    tracing::info!(target: "log_setup", "console logging ready");

    // a second global subscriber is refused
    assert!(std::panic::catch_unwind(|| setup_logging("info")).is_err());
}
