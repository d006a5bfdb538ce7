//! Structured logging using **tracing**.
//!
//! Binaries install a JSON subscriber writing to stderr so stdout stays
//! reserved for reports (and, for the language server, for the protocol).
//! Library code only emits events.

use std::path::Path;

use tracing::{error, info, warn};

use crate::error::DeadbindError;

/// Installs the global JSON subscriber.
///
/// Filtering follows `RUST_LOG` (e.g. `RUST_LOG=deadbind_core=debug`).
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_structured_logging() {
    let installed = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if !installed {
        warn!("tracing subscriber already installed");
    }
}

pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs a per-file failure: recoverable errors as warnings, the rest as
/// errors.
pub fn log_file_error(path: &Path, err: &DeadbindError) {
    if err.is_recoverable() {
        warn!(path = %path.display(), error = %err, "file skipped");
    } else {
        error!(path = %path.display(), error = %err, "file skipped");
    }
}
