use tracing::Level;

/// `DEBUG=true` (any case) turns on debug output like `--debug` does.
pub fn debug_from_env() -> bool {
    std::env::var("DEBUG")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn max_level(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the process-wide fmt subscriber. Called once from `main`.
pub fn init_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_max_level(max_level(debug))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
