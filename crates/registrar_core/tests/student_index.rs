use registrar_core::db::open_db_in_memory;
use registrar_core::dispatch::{execute_scope, CancellationToken};
use registrar_core::handlers::build_dispatcher;
use registrar_core::handlers::students::{StudentIndexQuery, STUDENT_PAGE_SIZE};
use registrar_core::repo::student_repo::SortOrder;
use rusqlite::{params, Connection};

fn seed_students(conn: &Connection, count: i64) {
    for n in 1..=count {
        conn.execute(
            "INSERT INTO students (last_name, first_name, enrollment_date)
             VALUES (?1, ?2, ?3);",
            params![format!("Last{n:02}"), format!("First{n:02}"), n * 1000],
        )
        .unwrap();
    }
}

#[test]
fn first_page_is_bounded_and_carries_totals() {
    let mut conn = open_db_in_memory().unwrap();
    seed_students(&conn, 7);
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(
            &StudentIndexQuery {
                page: Some(1),
                ..StudentIndexQuery::default()
            },
            ctx,
        )
    })
    .unwrap();

    assert_eq!(STUDENT_PAGE_SIZE, 3);
    assert_eq!(result.results.items().len(), 3);
    assert_eq!(result.results.total_count(), 7);
    assert_eq!(result.results.total_pages(), 3);
    assert_eq!(result.results.items()[0].last_name, "Last01");
}

#[test]
fn page_beyond_the_last_returns_the_last_page_not_an_empty_one() {
    let mut conn = open_db_in_memory().unwrap();
    seed_students(&conn, 7);
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(
            &StudentIndexQuery {
                page: Some(5),
                ..StudentIndexQuery::default()
            },
            ctx,
        )
    })
    .unwrap();

    assert_eq!(result.results.page_index(), 3);
    assert_eq!(result.results.items().len(), 1);
    assert_eq!(result.results.items()[0].last_name, "Last07");
}

#[test]
fn fresh_search_string_resets_paging_and_filters() {
    let mut conn = open_db_in_memory().unwrap();
    seed_students(&conn, 7);
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(
            &StudentIndexQuery {
                search_string: Some("Last07".to_string()),
                page: Some(3),
                ..StudentIndexQuery::default()
            },
            ctx,
        )
    })
    .unwrap();

    assert_eq!(result.results.page_index(), 1);
    assert_eq!(result.results.total_count(), 1);
    assert_eq!(result.results.items()[0].last_name, "Last07");
    assert_eq!(result.current_filter.as_deref(), Some("Last07"));
}

#[test]
fn carried_over_filter_keeps_the_requested_page() {
    let mut conn = open_db_in_memory().unwrap();
    seed_students(&conn, 7);
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(
            &StudentIndexQuery {
                current_filter: Some("Last".to_string()),
                page: Some(2),
                ..StudentIndexQuery::default()
            },
            ctx,
        )
    })
    .unwrap();

    assert_eq!(result.results.page_index(), 2);
    assert_eq!(result.results.items()[0].last_name, "Last04");
}

#[test]
fn descending_name_sort_is_applied_before_pagination() {
    let mut conn = open_db_in_memory().unwrap();
    seed_students(&conn, 7);
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(
            &StudentIndexQuery {
                sort: SortOrder::NameDesc,
                ..StudentIndexQuery::default()
            },
            ctx,
        )
    })
    .unwrap();

    assert_eq!(result.results.items()[0].last_name, "Last07");
}

#[test]
fn index_rows_carry_enrollment_counts() {
    let mut conn = open_db_in_memory().unwrap();
    seed_students(&conn, 2);
    conn.execute_batch(
        "INSERT INTO instructors (last_name, first_name, hire_date) VALUES ('Staff', 'One', 0);
         INSERT INTO departments (name, budget_cents, start_date, version)
             VALUES ('Maths', 100000, 0, '11111111-1111-1111-1111-111111111111');
         INSERT INTO courses (id, title, credits, department_id) VALUES (1045, 'Calculus', 4, 1);
         INSERT INTO enrollments (course_id, student_id) VALUES (1045, 1);
         INSERT INTO enrollments (course_id, student_id) VALUES (1045, 2);
         INSERT INTO enrollments (course_id, student_id) VALUES (1045, 1);",
    )
    .unwrap();

    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&StudentIndexQuery::default(), ctx)
    })
    .unwrap();

    assert_eq!(result.results.items()[0].enrollments_count, 2);
    assert_eq!(result.results.items()[1].enrollments_count, 1);
}

#[test]
fn index_result_serializes_with_paging_metadata() {
    let mut conn = open_db_in_memory().unwrap();
    seed_students(&conn, 2);
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&StudentIndexQuery::default(), ctx)
    })
    .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["results"]["total_count"], 2);
    assert_eq!(json["results"]["items"][0]["last_name"], "Last01");
}

#[test]
fn empty_table_yields_the_documented_empty_page_convention() {
    let mut conn = open_db_in_memory().unwrap();
    let dispatcher = build_dispatcher().unwrap();
    let cancellation = CancellationToken::new();

    let result = execute_scope(&mut conn, &cancellation, |ctx| {
        dispatcher.process(&StudentIndexQuery::default(), ctx)
    })
    .unwrap();

    assert!(result.results.items().is_empty());
    assert_eq!(result.results.total_count(), 0);
    assert_eq!(result.results.total_pages(), 0);
    assert_eq!(result.results.page_index(), 1);
}
