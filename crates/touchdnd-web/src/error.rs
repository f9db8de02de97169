//! Backend error type.

/// Errors surfaced by the touch backend lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Another backend already holds the process-wide setup lock.
    ///
    /// Two active backends would dispatch every action twice.
    #[error("cannot have two touch backends set up at the same time")]
    AlreadyActive,
}
