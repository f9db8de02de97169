//! Logging shim.
//!
//! With the `tracing` feature enabled this re-exports the `tracing` event
//! macros. Without it, the same macro names expand to nothing, so call sites
//! never need their own `#[cfg(feature = "tracing")]` guards.
//!
//! ```ignore
//! use touchdnd_core::{debug, trace};
//!
//! debug!(source = %id, "drag began");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

/// No-op `trace!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// No-op `debug!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

/// No-op `info!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

/// No-op `warn!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

/// No-op `error!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {};
}
