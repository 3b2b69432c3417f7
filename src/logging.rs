//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with a default filter level of `info`.
/// Override with the RUST_LOG environment variable.
///
/// # Example
/// ```no_run
/// thistle::logging::init();
/// log::info!("Viewer started");
/// ```
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Like [`init`], but safe to call more than once (tests, repeated demo setup)
pub fn try_init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
