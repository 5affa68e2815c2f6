//! Cooperative cancellation of a running search

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative stop signal shared between a search and whoever owns the clock
///
/// Clones share the same flag. The search polls it between phases and
/// around every child it descends into.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clears the flag so the token can be reused for the next move
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}
