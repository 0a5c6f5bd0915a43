use registrar_core::db::open_db_in_memory;
use registrar_core::dispatch::{execute_scope, CancellationToken, Dispatcher, ProcessError};
use registrar_core::handlers::build_dispatcher;
use registrar_core::handlers::departments::{
    DepartmentCreateCommand, DepartmentDeleteCommand, DepartmentEditCommand, DepartmentEditQuery,
};
use registrar_core::model::department::{Department, DepartmentId};
use rusqlite::Connection;

fn create_department(conn: &mut Connection, dispatcher: &Dispatcher) -> DepartmentId {
    let cancellation = CancellationToken::new();
    execute_scope(conn, &cancellation, |ctx| {
        dispatcher.process(
            &DepartmentCreateCommand {
                name: "English".to_string(),
                budget_cents: 35_000_000,
                start_date: 1_600_000_000_000,
                administrator_id: None,
            },
            ctx,
        )
    })
    .unwrap()
}

fn load_department(
    conn: &mut Connection,
    dispatcher: &Dispatcher,
    id: DepartmentId,
) -> Department {
    let cancellation = CancellationToken::new();
    execute_scope(conn, &cancellation, |ctx| {
        dispatcher.process(&DepartmentEditQuery { id }, ctx)
    })
    .unwrap()
}

fn edit_command(department: &Department, name: &str) -> DepartmentEditCommand {
    DepartmentEditCommand {
        id: department.id,
        name: name.to_string(),
        budget_cents: department.budget_cents,
        start_date: department.start_date,
        administrator_id: department.administrator_id,
        version: department.version.clone(),
    }
}

#[test]
fn edit_with_the_current_token_succeeds_and_rotates_it() {
    let mut conn = open_db_in_memory().unwrap();
    let dispatcher = build_dispatcher().unwrap();
    let id = create_department(&mut conn, &dispatcher);

    let before = load_department(&mut conn, &dispatcher, id);
    let cancellation = CancellationToken::new();
    execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&edit_command(&before, "Languages"), ctx)
    })
    .unwrap();

    let after = load_department(&mut conn, &dispatcher, id);
    assert_eq!(after.name, "Languages");
    assert_ne!(after.version, before.version, "token must rotate on write");
}

#[test]
fn edit_with_a_stale_token_surfaces_a_conflict_and_applies_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let dispatcher = build_dispatcher().unwrap();
    let id = create_department(&mut conn, &dispatcher);

    // Two callers read the same version.
    let first_read = load_department(&mut conn, &dispatcher, id);
    let second_read = load_department(&mut conn, &dispatcher, id);
    assert_eq!(first_read.version, second_read.version);

    let cancellation = CancellationToken::new();
    execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&edit_command(&first_read, "Languages"), ctx)
    })
    .unwrap();

    // The loser's write must conflict, never silently retry or merge.
    let err = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&edit_command(&second_read, "Philosophy"), ctx)
    })
    .unwrap_err();
    assert!(matches!(err, ProcessError::ConcurrencyConflict { .. }));

    let current = load_department(&mut conn, &dispatcher, id);
    assert_eq!(current.name, "Languages", "losing write must not apply");
}

#[test]
fn delete_with_the_current_token_removes_the_row() {
    let mut conn = open_db_in_memory().unwrap();
    let dispatcher = build_dispatcher().unwrap();
    let id = create_department(&mut conn, &dispatcher);
    let department = load_department(&mut conn, &dispatcher, id);

    let cancellation = CancellationToken::new();
    execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(
            &DepartmentDeleteCommand {
                id,
                version: department.version.clone(),
            },
            ctx,
        )
    })
    .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM departments;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn delete_with_a_stale_token_surfaces_a_conflict() {
    let mut conn = open_db_in_memory().unwrap();
    let dispatcher = build_dispatcher().unwrap();
    let id = create_department(&mut conn, &dispatcher);

    let stale = load_department(&mut conn, &dispatcher, id);
    let cancellation = CancellationToken::new();
    execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&edit_command(&stale, "Languages"), ctx)
    })
    .unwrap();

    let err = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(
            &DepartmentDeleteCommand {
                id,
                version: stale.version.clone(),
            },
            ctx,
        )
    })
    .unwrap_err();
    assert!(matches!(err, ProcessError::ConcurrencyConflict { .. }));
}

#[test]
fn editing_a_missing_department_surfaces_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let err = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&DepartmentEditQuery { id: 404 }, ctx)
    })
    .unwrap_err();
    assert!(matches!(err, ProcessError::NotFound { .. }));
}

#[test]
fn rejected_department_edit_reports_field_failures() {
    let mut conn = open_db_in_memory().unwrap();
    let dispatcher = build_dispatcher().unwrap();
    let id = create_department(&mut conn, &dispatcher);
    let department = load_department(&mut conn, &dispatcher, id);

    let mut invalid = edit_command(&department, "En");
    invalid.budget_cents = -1;

    let cancellation = CancellationToken::new();
    let err = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&invalid, ctx)
    })
    .unwrap_err();

    match err {
        ProcessError::Validation(result) => {
            let fields: Vec<&str> = result
                .failures()
                .iter()
                .map(|failure| failure.field.as_str())
                .collect();
            assert_eq!(fields, vec!["name", "budget_cents"]);
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    let unchanged = load_department(&mut conn, &dispatcher, id);
    assert_eq!(unchanged.name, "English");
}
