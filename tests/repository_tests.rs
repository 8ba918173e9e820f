mod common;
use common::{d, ist, open_test_pool};

use chrono::NaiveDate;
use marketops::core::logic::Core;
use marketops::db::db_utils::{MAX_IDS_PER_QUERY, id_chunks, placeholders};
use marketops::db::queries::{
    NewTaskRow, insert_employee, insert_market, insert_session, insert_task_row,
    load_sessions_for_markets, load_sessions_in_range, load_task_rows_for_markets,
    lookup_employee_names, lookup_market_names,
};
use marketops::models::task::{MediaType, TaskKind, TaskTable};

#[test]
fn id_chunks_dedupe_and_split() {
    let mut ids: Vec<i64> = (1..=1901).collect();
    ids.extend([5, 5, 1900]);

    let chunks = id_chunks(&ids);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].len(), MAX_IDS_PER_QUERY);
    assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), 1901);
    assert!(id_chunks(&[]).is_empty());
    assert_eq!(placeholders(3), "?,?,?");
}

#[test]
fn name_lookup_spans_several_chunks() {
    let pool = open_test_pool("repo_name_lookup");
    let tx = pool.conn.unchecked_transaction().expect("tx");
    let mut ids = Vec::new();
    for i in 0..(MAX_IDS_PER_QUERY + 150) {
        ids.push(insert_employee(&tx, &format!("Employee {i}")).expect("insert"));
    }
    tx.commit().expect("commit");

    let mut requested = ids.clone();
    requested.push(ids[0]);
    requested.push(999_999);

    let names = lookup_employee_names(&pool.conn, &requested).expect("lookup");
    assert_eq!(names.len(), ids.len());
    assert_eq!(names.get(&ids[0]).map(String::as_str), Some("Employee 0"));
    assert!(!names.contains_key(&999_999));

    assert!(lookup_market_names(&pool.conn, &[]).expect("lookup").is_empty());
}

#[test]
fn sessions_load_for_many_markets_at_once() {
    let pool = open_test_pool("repo_many_markets");
    let day = d("2025-06-01");
    let tx = pool.conn.unchecked_transaction().expect("tx");
    let user = insert_employee(&tx, "Asha Rao").expect("employee");
    let mut markets = Vec::new();
    for i in 0..(MAX_IDS_PER_QUERY + 50) {
        let m = insert_market(&tx, &format!("Market {i}")).expect("market");
        insert_session(&tx, user, m, &day, &ist("2025-06-01", "09:00")).expect("session");
        markets.push(m);
    }
    // same employee, another day: excluded
    insert_session(&tx, user, markets[0], &d("2025-06-02"), &ist("2025-06-02", "09:00"))
        .expect("session");
    tx.commit().expect("commit");

    let sessions = load_sessions_for_markets(&pool.conn, &markets, &day).expect("load");
    assert_eq!(sessions.len(), markets.len());
    assert!(sessions.iter().all(|s| s.session_date == day));

    let ranged =
        load_sessions_in_range(&pool.conn, &day, &d("2025-06-02"), Some(markets[0])).expect("range");
    assert_eq!(ranged.len(), 2);
    assert_eq!(ranged[0].session_date, d("2025-06-02"));
}

#[test]
fn task_rows_come_back_from_every_table() {
    let pool = open_test_pool("repo_task_rows");
    let day = d("2025-06-01");
    let user = insert_employee(&pool.conn, "Ravi").expect("employee");
    let m1 = insert_market(&pool.conn, "Central").expect("market");
    let m2 = insert_market(&pool.conn, "North").expect("market");
    let sid = insert_session(&pool.conn, user, m1, &day, &ist("2025-06-01", "09:00")).expect("session");

    let new_row = |kind: TaskKind, market_id: i64, date: NaiveDate, stall_no: Option<i64>| NewTaskRow {
        kind,
        session_id: Some(sid),
        market_id,
        user_id: user,
        date,
        stall_no,
        details: String::new(),
        at: ist("2025-06-01", "10:00"),
    };

    for kind in TaskKind::ALL {
        let stall = (kind == TaskKind::StallConfirmations).then_some(1);
        insert_task_row(&pool.conn, &new_row(kind, m1, day, stall)).expect("insert");
    }
    insert_task_row(&pool.conn, &new_row(TaskKind::Offers, m2, day, None)).expect("insert");
    insert_task_row(&pool.conn, &new_row(TaskKind::Offers, m1, d("2025-06-03"), None)).expect("insert");

    let rows = load_task_rows_for_markets(&pool.conn, &[m1], &day, &day).expect("load");
    assert_eq!(rows.len(), TaskKind::ALL.len());
    for table in TaskTable::ALL {
        assert!(rows.iter().any(|r| r.table == table), "missing rows of {table:?}");
    }

    let selfie = rows
        .iter()
        .find(|r| r.media_type == Some(MediaType::Selfie))
        .expect("selfie row");
    assert_eq!(selfie.captured_at, Some(ist("2025-06-01", "10:00")));

    let both = load_task_rows_for_markets(&pool.conn, &[m1, m2], &day, &d("2025-06-03")).expect("load");
    assert_eq!(both.len(), TaskKind::ALL.len() + 2);
}

#[test]
fn unknown_media_type_loads_without_a_kind() {
    let pool = open_test_pool("repo_unknown_media");
    let user = insert_employee(&pool.conn, "Ravi").expect("employee");
    let market = insert_market(&pool.conn, "Central").expect("market");
    pool.conn
        .execute(
            "INSERT INTO media (session_id, market_id, user_id, date, media_type, created_at)
             VALUES (NULL, ?1, ?2, '2025-06-01', 'drone_footage', '2025-06-01T04:00:00+00:00')",
            [market, user],
        )
        .expect("raw insert");

    let rows = load_task_rows_for_markets(&pool.conn, &[market], &d("2025-06-01"), &d("2025-06-01"))
        .expect("load");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].media_type, None);
    assert_eq!(TaskKind::of_row(&rows[0]), None);
}

#[test]
fn load_day_without_markets_is_empty() {
    let pool = open_test_pool("repo_empty_day");
    let batch = Core::load_day(&pool.conn, &[], &d("2025-06-01")).expect("load");
    assert!(batch.sessions.is_empty());
    assert!(batch.rows.is_empty());
}
