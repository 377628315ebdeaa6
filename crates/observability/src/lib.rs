//! Tracing/logging setup shared by storefront binaries.

/// Tracing configuration (filters, formatting).
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide logging with JSON output.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}
