//! Cancellation and single-run guard

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{FleetError, FleetResult};

/// Cooperative cancellation flag shared with signal handlers
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Held for the duration of a run or script action
pub(crate) struct ActiveRunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ActiveRunGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> FleetResult<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| FleetError::AlreadyRunning)?;
        Ok(Self { flag })
    }
}

impl Drop for ActiveRunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
