//! Process-wide exclusivity guard for the one-backend-at-a-time contract.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::BackendError;

static TOUCH_BACKEND_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Ownership token for the window listeners.
///
/// Held by a set-up backend; dropping it makes setup available again.
#[derive(Debug)]
pub(crate) struct BackendLock {
    _private: (),
}

impl BackendLock {
    pub(crate) fn acquire() -> Result<Self, BackendError> {
        if TOUCH_BACKEND_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BackendError::AlreadyActive);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for BackendLock {
    fn drop(&mut self) {
        TOUCH_BACKEND_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// True while some backend in this process is set up.
#[must_use]
pub fn is_backend_active() -> bool {
    TOUCH_BACKEND_ACTIVE.load(Ordering::SeqCst)
}
