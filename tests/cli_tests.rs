use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_cli_db, mops, setup_test_db};

const DAY: &str = "2025-06-01";

/// Market 1 "Central", employee 1 "Asha Rao" punched in at 09:00 IST on DAY.
fn seeded_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    init_cli_db(&db_path);

    mops()
        .args(["--db", &db_path, "add-market", "Central"])
        .assert()
        .success()
        .stdout(contains("Registered market 'Central' with id 1"));

    mops()
        .args(["--db", &db_path, "add-employee", "Asha Rao"])
        .assert()
        .success()
        .stdout(contains("with id 1"));

    mops()
        .args([
            "--db", &db_path, "punch", "--employee", "1", "--market", "1", "--in", "--at", "09:00",
            "--date", DAY,
        ])
        .assert()
        .success()
        .stdout(contains("Session 1 opened").and(contains("in 09:00")));

    db_path
}

#[test]
fn init_creates_database() {
    let db_path = setup_test_db("cli_init");
    mops()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized at"));

    assert!(std::path::Path::new(&db_path).exists());

    // migrations are not applied twice
    mops()
        .args(["--db", &db_path, "--test", "--json", "init"])
        .assert()
        .success()
        .stdout(contains("\"migrations_applied\": 0"));
}

#[test]
fn day_flow_from_punch_to_finalize() {
    let db_path = seeded_db("cli_day_flow");

    mops()
        .args(["--db", &db_path, "task", "--session", "1", "--kind", "offers", "--at", "10:00"])
        .assert()
        .success()
        .stdout(contains("Recorded offers"));

    mops()
        .args(["--db", &db_path, "plan", "--session", "1", "--stalls", "1,2,3", "--at", "11:00"])
        .assert()
        .success()
        .stdout(contains("3 stall confirmation(s)"));

    mops()
        .args(["--db", &db_path, "status", "--market", "1", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("Asha Rao").and(contains("half_day")).and(contains("3/9")));

    mops()
        .args(["--db", &db_path, "--json", "live", "--date", DAY])
        .assert()
        .success()
        .stdout(
            contains("\"stall_confirmations_count\": 3")
                .and(contains("\"active_employees\": 1"))
                .and(contains("\"market_name\": \"Central\"")),
        );

    mops()
        .args(["--db", &db_path, "sessions", "--from", DAY, "--today", "2025-06-02"])
        .assert()
        .success()
        .stdout(contains("expired").and(contains("incomplete")));

    mops()
        .args([
            "--db", &db_path, "punch", "--employee", "1", "--market", "1", "--out", "--at", "17:00",
            "--date", DAY,
        ])
        .assert()
        .success()
        .stdout(contains("closed at 17:00").and(contains("completed")));

    mops()
        .args(["--db", &db_path, "finalize", "--session", "1"])
        .assert()
        .success()
        .stdout(contains("is now finalized"));

    mops()
        .args(["--db", &db_path, "task", "--session", "1", "--kind", "selfie"])
        .assert()
        .failure()
        .stderr(contains("can no longer be changed"));

    mops()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("punch_in").and(contains("planning")).and(contains("finalize")));
}

#[test]
fn failed_plan_is_rolled_back() {
    let db_path = seeded_db("cli_plan_rollback");

    mops()
        .args(["--db", &db_path, "task", "--session", "1", "--kind", "confirmations", "--stall", "2"])
        .assert()
        .success();

    mops()
        .args(["--db", &db_path, "plan", "--session", "1", "--stalls", "1,2"])
        .assert()
        .failure()
        .stderr(contains("Rolled back 2 row(s)").and(contains("Write interrupted after 2 step(s)")));

    mops()
        .args(["--db", &db_path, "--json", "live", "--market", "1", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("\"stall_confirmations_count\": 1"));

    mops()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("rollback"));
}

#[test]
fn invalid_input_is_reported() {
    let db_path = seeded_db("cli_invalid_input");

    mops()
        .args(["--db", &db_path, "task", "--session", "1", "--kind", "dance"])
        .assert()
        .failure()
        .stderr(contains("Invalid task kind: dance"));

    mops()
        .args(["--db", &db_path, "plan", "--session", "1", "--stalls", "4,4"])
        .assert()
        .failure()
        .stderr(contains("listed twice"));

    mops()
        .args(["--db", &db_path, "status", "--market", "1", "--date", "2025-02-30"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));

    mops()
        .args(["--db", &db_path, "live", "--market", "9", "--date", DAY])
        .assert()
        .failure()
        .stderr(contains("Unknown market id: 9"));

    // --in or --out is mandatory
    mops()
        .args(["--db", &db_path, "punch", "--employee", "1", "--market", "1"])
        .assert()
        .failure();

    mops()
        .args([
            "--db", &db_path, "punch", "--employee", "1", "--market", "1", "--in", "--at", "09:30",
            "--date", DAY,
        ])
        .assert()
        .failure()
        .stderr(contains("already punched in"));
}

#[test]
fn managers_are_judged_on_hours() {
    let db_path = setup_test_db("cli_managers");
    init_cli_db(&db_path);

    mops()
        .args(["--db", &db_path, "add-employee", "Kiran Das"])
        .assert()
        .success();

    for (flag, at) in [("--in", "09:00"), ("--out", "17:30")] {
        mops()
            .args([
                "--db", &db_path, "manager-punch", "--employee", "1", "--role", "bdo", flag, "--at", at,
                "--date", DAY,
            ])
            .assert()
            .success();
    }

    mops()
        .args(["--db", &db_path, "managers", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("Kiran Das").and(contains("full_day")).and(contains("08:30")));

    mops()
        .args(["--db", &db_path, "--json", "managers", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("\"status\": \"full_day\"").and(contains("\"duration_minutes\": 510")));
}

#[test]
fn config_print_shows_thresholds() {
    let db_path = setup_test_db("cli_config");
    mops()
        .args(["--db", &db_path, "config", "--print"])
        .assert()
        .success()
        .stdout(contains("full_day_hours").and(contains(db_path.as_str())));
}

#[test]
fn punch_out_after_midnight_and_mismatched_dates() {
    let db_path = seeded_db("cli_night_punch");

    mops()
        .args([
            "--db", &db_path, "punch", "--employee", "1", "--market", "1", "--out", "--at",
            "2025-06-04T10:00:00+05:30", "--date", DAY,
        ])
        .assert()
        .failure()
        .stderr(contains("outside business date"));

    mops()
        .args([
            "--db", &db_path, "punch", "--employee", "1", "--market", "1", "--out", "--at",
            "2025-06-02T01:00:00+05:30",
        ])
        .assert()
        .success()
        .stdout(contains("Session 1").and(contains("closed at 01:00")));
}
