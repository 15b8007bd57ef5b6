//! Tracing/logging setup shared by the workspace binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};

/// Initialize process-wide tracing with default settings.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide tracing with explicit settings.
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init_with(settings: &LogSettings) {
    tracing::init_with(settings);
}
