use registrar_core::db::open_db_in_memory;
use registrar_core::dispatch::{
    contract, CancellationToken, Dispatcher, Handler, ProcessError, ProcessResult, Request,
    RequestContext, ValidationResult, Validator,
};
use registrar_core::handlers::{build_dispatcher, request_contracts};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct EchoRequest {
    payload: i64,
}

impl Request for EchoRequest {
    type Response = i64;
}

/// Handler that records whether it was invoked.
struct FlaggingEchoHandler {
    invoked: Arc<AtomicBool>,
}

impl Handler<EchoRequest> for FlaggingEchoHandler {
    fn handle(&self, request: &EchoRequest, _ctx: &RequestContext<'_>) -> ProcessResult<i64> {
        self.invoked.store(true, Ordering::SeqCst);
        Ok(request.payload)
    }
}

struct RejectingValidator;

impl Validator<EchoRequest> for RejectingValidator {
    fn validate(&self, _request: &EchoRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.push("payload", "always rejected");
        result
    }
}

struct FailingHandler;

impl Handler<EchoRequest> for FailingHandler {
    fn handle(&self, _request: &EchoRequest, _ctx: &RequestContext<'_>) -> ProcessResult<i64> {
        Err(ProcessError::NotFound {
            entity: "echo",
            id: "7".to_string(),
        })
    }
}

#[test]
fn full_application_wiring_passes_startup_check() {
    let dispatcher = build_dispatcher().unwrap();
    dispatcher
        .assert_configuration_valid(&request_contracts())
        .unwrap();
}

#[test]
fn startup_check_fails_when_a_handler_registration_is_withheld() {
    // Empty registry against the full application contract list.
    let dispatcher = Dispatcher::builder().build().unwrap();
    let err = dispatcher
        .assert_configuration_valid(&request_contracts())
        .unwrap_err();

    assert_eq!(err.issues().len(), request_contracts().len() + validated_count());
}

#[test]
fn startup_check_reports_missing_validator_separately() {
    let invoked = Arc::new(AtomicBool::new(false));
    let dispatcher = Dispatcher::builder()
        .handler(FlaggingEchoHandler {
            invoked: Arc::clone(&invoked),
        })
        .build()
        .unwrap();

    // Handler present, required validator missing.
    let err = dispatcher
        .assert_configuration_valid(&[contract::<EchoRequest>(true)])
        .unwrap_err();
    assert_eq!(err.issues().len(), 1);

    // Validator not required: same registry passes.
    dispatcher
        .assert_configuration_valid(&[contract::<EchoRequest>(false)])
        .unwrap();
}

#[test]
fn duplicate_handler_registration_fails_the_build() {
    let invoked = Arc::new(AtomicBool::new(false));
    let result = Dispatcher::builder()
        .handler(FlaggingEchoHandler {
            invoked: Arc::clone(&invoked),
        })
        .handler(FailingHandler)
        .build();

    assert!(result.is_err());
}

#[test]
fn unregistered_request_type_fails_with_handler_not_found() {
    let conn = open_db_in_memory().unwrap();
    let cancellation = CancellationToken::new();
    let ctx = RequestContext::new(&conn, &cancellation);

    let dispatcher = Dispatcher::builder().build().unwrap();
    let err = dispatcher
        .process(&EchoRequest { payload: 1 }, &ctx)
        .unwrap_err();

    assert!(matches!(err, ProcessError::HandlerNotFound { .. }));
}

#[test]
fn failing_validator_short_circuits_before_the_handler() {
    let conn = open_db_in_memory().unwrap();
    let cancellation = CancellationToken::new();
    let ctx = RequestContext::new(&conn, &cancellation);

    let invoked = Arc::new(AtomicBool::new(false));
    let dispatcher = Dispatcher::builder()
        .handler(FlaggingEchoHandler {
            invoked: Arc::clone(&invoked),
        })
        .validator(RejectingValidator)
        .build()
        .unwrap();

    let err = dispatcher
        .process(&EchoRequest { payload: 1 }, &ctx)
        .unwrap_err();

    match err {
        ProcessError::Validation(result) => {
            assert_eq!(result.failures().len(), 1);
            assert_eq!(result.failures()[0].field, "payload");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(!invoked.load(Ordering::SeqCst), "handler must never run");
}

#[test]
fn valid_request_reaches_the_handler_and_returns_its_response() {
    let conn = open_db_in_memory().unwrap();
    let cancellation = CancellationToken::new();
    let ctx = RequestContext::new(&conn, &cancellation);

    let invoked = Arc::new(AtomicBool::new(false));
    let dispatcher = Dispatcher::builder()
        .handler(FlaggingEchoHandler {
            invoked: Arc::clone(&invoked),
        })
        .build()
        .unwrap();

    let response = dispatcher
        .process(&EchoRequest { payload: 42 }, &ctx)
        .unwrap();
    assert_eq!(response, 42);
    assert!(invoked.load(Ordering::SeqCst));
}

#[test]
fn handler_failures_propagate_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let cancellation = CancellationToken::new();
    let ctx = RequestContext::new(&conn, &cancellation);

    let dispatcher = Dispatcher::builder().handler(FailingHandler).build().unwrap();
    let err = dispatcher
        .process(&EchoRequest { payload: 1 }, &ctx)
        .unwrap_err();

    match err {
        ProcessError::NotFound { entity, id } => {
            assert_eq!(entity, "echo");
            assert_eq!(id, "7");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn cancelled_token_aborts_before_the_handler_runs() {
    let conn = open_db_in_memory().unwrap();
    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let ctx = RequestContext::new(&conn, &cancellation);

    let invoked = Arc::new(AtomicBool::new(false));
    let dispatcher = Dispatcher::builder()
        .handler(FlaggingEchoHandler {
            invoked: Arc::clone(&invoked),
        })
        .build()
        .unwrap();

    let err = dispatcher
        .process(&EchoRequest { payload: 1 }, &ctx)
        .unwrap_err();
    assert!(matches!(err, ProcessError::Cancelled));
    assert!(!invoked.load(Ordering::SeqCst));
}

fn validated_count() -> usize {
    // Request types whose contract also demands a validator.
    6
}
