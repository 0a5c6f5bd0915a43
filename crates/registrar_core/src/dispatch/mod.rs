//! Request-processing kernel: typed dispatch, validation, transaction scopes.
//!
//! # Responsibility
//! - Define the `Request`/`Command`/`Query` contracts and the `Handler`
//!   capability every record page plugs into.
//! - Route each request to its single registered handler, running its
//!   validator first.
//! - Wrap one external request in one atomic transaction scope.
//!
//! # Invariants
//! - Each concrete request type resolves to at most one handler and at most
//!   one validator.
//! - Validation strictly precedes handling; a handler never observes an
//!   invalid request.
//! - Registries are built once at startup and are immutable afterwards.

use rusqlite::Connection;

pub mod cancel;
pub mod error;
pub mod registry;
pub mod scope;
pub mod validation;

pub use cancel::CancellationToken;
pub use error::{ProcessError, ProcessResult};
pub use registry::{
    contract, ConfigurationError, ConfigurationIssue, Dispatcher, DispatcherBuilder,
    RequestContract,
};
pub use scope::execute_scope;
pub use validation::{FieldFailure, ValidationResult, Validator};

/// A routable request. The concrete type determines which handler runs.
///
/// Requests are immutable value objects created per call and discarded after
/// dispatch; all per-call state lives here, never in handler fields.
pub trait Request: 'static {
    /// Value produced by the handler on success.
    type Response;
}

/// Marker for requests that mutate state.
pub trait Command: Request {}

/// Marker for requests that read state and never mutate.
pub trait Query: Request {}

/// The single component responsible for executing one request type.
///
/// Handlers are stateless across invocations; collaborators (the scope's
/// connection, the cancellation signal) arrive through the context, which
/// keeps one handler instance safe to reuse across concurrent scopes.
pub trait Handler<R: Request>: Send + Sync {
    fn handle(&self, request: &R, ctx: &RequestContext<'_>) -> ProcessResult<R::Response>;
}

/// Per-call collaborators threaded from the transaction scope into handlers.
///
/// The connection is the scope's own transaction (rusqlite transactions deref
/// to `Connection`), so every mutation a handler performs joins the same
/// atomic unit of work. Handlers cannot open nested scopes through it: scope
/// acquisition needs `&mut Connection`.
pub struct RequestContext<'scope> {
    conn: &'scope Connection,
    cancellation: &'scope CancellationToken,
}

impl<'scope> RequestContext<'scope> {
    pub fn new(conn: &'scope Connection, cancellation: &'scope CancellationToken) -> Self {
        Self { conn, cancellation }
    }

    /// Connection of the enclosing transaction scope.
    pub fn conn(&self) -> &Connection {
        self.conn
    }

    /// Cooperative cancellation signal for this external request.
    pub fn cancellation(&self) -> &CancellationToken {
        self.cancellation
    }
}
