// Logging tests
//
// The global subscriber can only be installed once per process, so a second
// initialization must report an error instead of panicking.

use watermarker::logging::{init_subscriber, LogFormat};

#[test]
fn test_second_subscriber_initialization_is_error() {
    let first = init_subscriber(LogFormat::Text, "debug");
    assert!(first.is_ok());

    let second = init_subscriber(LogFormat::Json, "info");

    assert!(second.is_err());
    tracing::info!(component = "logging_tests", "subscriber installed");
}
