//! Cooperative cancellation signal.
//!
//! # Responsibility
//! - Thread one external cancellation flag through dispatcher and handlers.
//!
//! # Invariants
//! - Cancellation aborts before any mutating call commits; a scope that has
//!   already begun committing is allowed to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag observed at dispatch time and before scope commit.
///
/// Clones observe the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
