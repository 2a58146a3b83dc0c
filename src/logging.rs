//! Logging setup for binaries using this crate.
//!
//! The library itself only emits through the `log` facade; linking a backend
//! is the application's call.

/// Initializes the logger with the `env_logger` crate.
///
/// Verbosity is controlled through the `RUST_LOG` environment variable,
/// e.g. `RUST_LOG=cc1101_rs=debug`.
pub fn init_logger() {
    env_logger::init();
}
