//! Transaction scope manager.
//!
//! # Responsibility
//! - Wrap one full request-handling cycle (possibly several dispatcher
//!   calls) in a single atomic unit of work.
//! - Commit on success, roll back on any failure, re-raising the original
//!   cause unmodified.
//!
//! # Invariants
//! - A scope moves Open → Committed or Open → RolledBack, never both; the
//!   rusqlite transaction is consumed by either path, so a finished scope
//!   cannot be reused.
//! - Scopes do not nest: acquisition needs `&mut Connection` while handlers
//!   only ever see the scope's `&Connection`.
//! - A rollback failure is logged but never masks the triggering error.

use crate::dispatch::cancel::CancellationToken;
use crate::dispatch::error::{ProcessError, ProcessResult};
use crate::dispatch::RequestContext;
use log::{error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Runs `body` inside one atomic transaction scope.
///
/// The body receives a [`RequestContext`] carrying the scope's transaction
/// connection and the cancellation signal; every dispatcher call made with
/// that context joins the same unit of work. On `Ok` the scope commits,
/// unless cancellation fired first, in which case it rolls back and returns
/// `ProcessError::Cancelled`. On `Err` the scope rolls back and returns the
/// body's error unchanged.
///
/// # Side effects
/// - Emits `scope` logging events with duration and terminal state.
pub fn execute_scope<T>(
    conn: &mut Connection,
    cancellation: &CancellationToken,
    body: impl FnOnce(&RequestContext<'_>) -> ProcessResult<T>,
) -> ProcessResult<T> {
    let started_at = Instant::now();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let outcome = {
        let ctx = RequestContext::new(&tx, cancellation);
        body(&ctx)
    };

    match outcome {
        Ok(value) => {
            if cancellation.is_cancelled() {
                rollback_logged(tx, "cancelled");
                return Err(ProcessError::Cancelled);
            }
            tx.commit()?;
            info!(
                "event=scope module=dispatch status=committed duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            error!(
                "event=scope module=dispatch status=rolled_back duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            rollback_logged(tx, "failed");
            Err(err)
        }
    }
}

fn rollback_logged(tx: Transaction<'_>, reason: &str) {
    if let Err(rollback_err) = tx.rollback() {
        // The original failure still propagates; record the secondary one.
        error!(
            "event=scope module=dispatch status=rollback_failed reason={reason} error={rollback_err}"
        );
    }
}
