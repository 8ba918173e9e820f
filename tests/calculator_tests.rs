mod common;
use common::{d, ist, media_for, row_for, session, stall_for};

use marketops::core::calculator::aggregator::{ActiveRule, MarketDay, aggregate, aggregate_markets};
use marketops::core::calculator::classifier::{
    HourThresholds, classify, classify_by_hours, classify_by_tasks, display_name, duration_minutes,
    initials,
};
use marketops::core::calculator::completion::{TaskCompletion, TaskIndex, evaluate};
use marketops::core::calculator::resolver::resolve_statuses;
use marketops::models::session::SessionStatus;
use marketops::models::status::{DayStatus, ManagerDayStatus, StatusLabel};
use marketops::models::task::{Checklist, MediaType, TaskKind, TaskRow, TaskTable};

const DAY: &str = "2025-06-01";

// ---------------------------------------------------------------------------
// Task completion
// ---------------------------------------------------------------------------

#[test]
fn market_scoped_tasks_match_market_date_and_user() {
    let s = session(1, 10, 100, DAY, Some(ist(DAY, "09:00")), None, SessionStatus::Active);
    let other_user = session(2, 11, 100, DAY, None, None, SessionStatus::Active);

    let mut offer = row_for(&other_user, TaskTable::Offers, 1, ist(DAY, "10:00"));
    offer.session_id = None;
    let feedback = row_for(&s, TaskTable::OrganiserFeedback, 2, ist(DAY, "10:05"));

    let index = TaskIndex::from_rows(&[offer, feedback]);
    let completion = evaluate(&s, &index, &Checklist::EMPLOYEE_DAY);

    assert!(!completion.is_done(TaskKind::Offers));
    assert!(completion.is_done(TaskKind::OrganiserFeedback));
    assert_eq!(completion.completed_count(), 1);
    assert_eq!(completion.total(), 9);
}

#[test]
fn session_scoped_media_only_counts_for_its_session() {
    let s1 = session(1, 10, 100, DAY, None, None, SessionStatus::Active);
    let s2 = session(2, 10, 101, DAY, None, None, SessionStatus::Active);

    let video = media_for(&s1, 1, Some(MediaType::MarketVideo), ist(DAY, "11:00"), None);
    let index = TaskIndex::from_rows(&[video]);

    assert!(index.has(TaskKind::MarketVideo, &s1));
    assert!(!index.has(TaskKind::MarketVideo, &s2));
}

#[test]
fn unknown_media_type_never_completes_a_task() {
    let s = session(1, 10, 100, DAY, None, None, SessionStatus::Active);
    let unknown = media_for(&s, 1, None, ist(DAY, "11:00"), None);

    let index = TaskIndex::from_rows(&[unknown]);
    let completion = evaluate(&s, &index, &Checklist::SESSION_REVIEW);
    assert_eq!(completion.completed_count(), 0);
}

#[test]
fn missing_flag_counts_as_not_done() {
    let completion = TaskCompletion::from_flags([(TaskKind::Offers, true)]);
    assert!(completion.is_done(TaskKind::Offers));
    assert!(!completion.is_done(TaskKind::MarketVideo));
    assert!(!completion.all_done(&Checklist::SESSION_REVIEW));
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[test]
fn task_rule_is_monotonic_in_completed_count() {
    let total = Checklist::EMPLOYEE_DAY.total();
    let statuses: Vec<DayStatus> = (0..=total).map(|c| classify_by_tasks(c, total)).collect();

    assert_eq!(statuses[0], DayStatus::Active);
    assert_eq!(statuses[total], DayStatus::Completed);
    assert!(statuses.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn five_of_nine_without_punch_out_is_half_day() {
    let s = session(7, 42, 100, DAY, Some(ist(DAY, "09:00")), None, SessionStatus::Active);
    let status = classify(&s, Some("asha rao"), 5, 9);

    assert_eq!(status.status, DayStatus::HalfDay);
    assert_eq!(status.duration_minutes, None);
    assert_eq!(status.initials, "AR");
    assert_eq!(status.id, 42);
    assert_eq!(status.session_id, 7);
}

#[test]
fn time_rule_thresholds() {
    let t = HourThresholds::default();
    let at = |hhmm: &str| Some(ist(DAY, hhmm));

    assert_eq!(classify_by_hours(at("09:00"), at("17:30"), t), ManagerDayStatus::FullDay);
    assert_eq!(classify_by_hours(at("09:00"), at("17:00"), t), ManagerDayStatus::FullDay);
    assert_eq!(classify_by_hours(at("09:00"), at("13:00"), t), ManagerDayStatus::HalfDay);
    assert_eq!(classify_by_hours(at("09:00"), at("12:00"), t), ManagerDayStatus::Absent);
    assert_eq!(classify_by_hours(at("09:00"), None, t), ManagerDayStatus::Active);
}

#[test]
fn duration_is_floored_and_absent_without_both_punches() {
    let start = common::utc(2025, 6, 1, 3, 30, 0);
    let later = common::utc(2025, 6, 1, 3, 31, 59);
    let earlier = common::utc(2025, 6, 1, 3, 29, 30);

    assert_eq!(duration_minutes(Some(start), Some(later)), Some(1));
    assert_eq!(duration_minutes(Some(start), Some(earlier)), Some(-1));
    assert_eq!(duration_minutes(Some(start), None), None);
    assert_eq!(duration_minutes(None, Some(start)), None);
}

#[test]
fn names_and_initials() {
    assert_eq!(display_name(None), "Unknown");
    assert_eq!(display_name(Some("   ")), "Unknown");
    assert_eq!(initials("mary anne smith"), "MA");
    assert_eq!(initials("ravi"), "R");
    assert_eq!(initials(""), "U");
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

fn market_fixture() -> (Vec<marketops::models::session::Session>, Vec<TaskRow>) {
    let s1 = session(1, 10, 100, DAY, Some(ist(DAY, "08:00")), None, SessionStatus::Active);
    let s2 = session(2, 11, 100, DAY, Some(ist(DAY, "08:10")), None, SessionStatus::Active);
    let s3 = session(
        3,
        12,
        100,
        DAY,
        Some(ist(DAY, "08:20")),
        Some(ist(DAY, "16:00")),
        SessionStatus::Completed,
    );

    let rows = vec![
        stall_for(&s3, 1, 1, ist(DAY, "09:00")),
        stall_for(&s3, 2, 2, ist(DAY, "09:01")),
        stall_for(&s3, 3, 3, ist(DAY, "09:02")),
        stall_for(&s3, 4, 4, ist(DAY, "11:00")),
        media_for(&s1, 1, Some(MediaType::MarketVideo), ist(DAY, "09:30"), Some(ist(DAY, "10:00"))),
    ];

    (vec![s1, s2, s3], rows)
}

#[test]
fn live_rule_counts_stored_active_sessions() {
    let (sessions, rows) = market_fixture();
    let day = MarketDay::new(d(DAY), &sessions, &rows);
    let summary = aggregate(100, "Central", &day, ActiveRule::LiveSessions);

    assert_eq!(summary.active_employees, 2);
    assert_eq!(summary.stall_confirmations_count, 4);
    assert_eq!(summary.media_uploads_count, 1);
    assert_eq!(summary.task_stats.get(&TaskKind::StallConfirmations), Some(&4));
    assert_eq!(summary.task_stats.get(&TaskKind::MarketVideo), Some(&1));
}

#[test]
fn task_rule_counts_sessions_with_nothing_done() {
    let (sessions, rows) = market_fixture();
    let day = MarketDay::new(d(DAY), &sessions, &rows);

    // s1 uploaded a video, s3 confirmed stalls: only s2 has nothing
    let summary = aggregate(100, "Central", &day, ActiveRule::TaskBased);
    assert_eq!(summary.active_employees, 1);
}

#[test]
fn task_rule_leaves_out_a_session_with_the_full_checklist_done() {
    let s1 = session(1, 10, 100, DAY, Some(ist(DAY, "08:00")), None, SessionStatus::Active);
    let s2 = session(2, 11, 100, DAY, Some(ist(DAY, "08:10")), None, SessionStatus::Active);
    let s3 = session(3, 12, 100, DAY, Some(ist(DAY, "08:20")), None, SessionStatus::Active);

    let mut rows = vec![
        row_for(&s3, TaskTable::Offers, 1, ist(DAY, "09:00")),
        row_for(&s3, TaskTable::NonAvailableCommodities, 1, ist(DAY, "09:05")),
        row_for(&s3, TaskTable::OrganiserFeedback, 1, ist(DAY, "09:10")),
        row_for(&s3, TaskTable::StallInspections, 1, ist(DAY, "09:15")),
        row_for(&s3, TaskTable::NextDayPlanning, 1, ist(DAY, "17:00")),
        media_for(&s3, 1, Some(MediaType::OutsideRates), ist(DAY, "10:00"), None),
        media_for(&s3, 2, Some(MediaType::MarketVideo), ist(DAY, "10:30"), None),
        media_for(&s3, 3, Some(MediaType::CleaningVideo), ist(DAY, "16:00"), None),
    ];
    for stall in 1..=4 {
        rows.push(stall_for(&s3, stall, stall, ist(DAY, "17:01")));
    }

    let completion = evaluate(&s3, &TaskIndex::from_rows(&rows), &Checklist::EMPLOYEE_DAY);
    assert!(completion.all_done(&Checklist::EMPLOYEE_DAY));

    let sessions = vec![s1, s2, s3];
    let day = MarketDay::new(d(DAY), &sessions, &rows);

    let summary = aggregate(100, "Central", &day, ActiveRule::TaskBased);
    assert_eq!(summary.active_employees, 2);
    assert_eq!(summary.stall_confirmations_count, 4);
    assert_eq!(summary.media_uploads_count, 3);
    assert_eq!(summary.last_upload_time, Some(ist(DAY, "17:01")));
}

#[test]
fn last_upload_is_latest_of_media_and_confirmations() {
    let (sessions, rows) = market_fixture();
    let day = MarketDay::new(d(DAY), &sessions, &rows);
    let summary = aggregate(100, "Central", &day, ActiveRule::LiveSessions);
    assert_eq!(summary.last_upload_time, Some(ist(DAY, "11:00")));

    // media captured later than any confirmation wins
    let mut later = rows.clone();
    later.push(media_for(&sessions[1], 2, Some(MediaType::Selfie), ist(DAY, "12:00"), None));
    let day = MarketDay::new(d(DAY), &sessions, &later);
    let summary = aggregate(100, "Central", &day, ActiveRule::LiveSessions);
    assert_eq!(summary.last_upload_time, Some(ist(DAY, "12:00")));
}

#[test]
fn aggregation_is_order_independent() {
    let (sessions, rows) = market_fixture();
    let forward = MarketDay::new(d(DAY), &sessions, &rows);

    let mut rev_sessions = sessions.clone();
    rev_sessions.reverse();
    let mut rev_rows = rows.clone();
    rev_rows.reverse();
    let backward = MarketDay::new(d(DAY), &rev_sessions, &rev_rows);

    for rule in [ActiveRule::TaskBased, ActiveRule::LiveSessions] {
        assert_eq!(
            aggregate(100, "Central", &forward, rule),
            aggregate(100, "Central", &backward, rule)
        );
    }
}

#[test]
fn unknown_media_counts_as_upload_only() {
    let s = session(1, 10, 100, DAY, None, None, SessionStatus::Active);
    let rows = vec![media_for(&s, 1, None, ist(DAY, "10:00"), None)];
    let sessions = vec![s];
    let day = MarketDay::new(d(DAY), &sessions, &rows);

    let summary = aggregate(100, "Central", &day, ActiveRule::LiveSessions);
    assert_eq!(summary.media_uploads_count, 1);
    assert!(summary.task_stats.is_empty());
}

#[test]
fn batch_aggregation_follows_market_order_and_ignores_other_dates() {
    let (mut sessions, mut rows) = market_fixture();
    let other = session(9, 13, 200, "2025-05-31", None, None, SessionStatus::Active);
    rows.push(stall_for(&other, 99, 1, ist("2025-05-31", "10:00")));
    sessions.push(other);

    let day = MarketDay::new(d(DAY), &sessions, &rows);
    let markets = vec![(200, "North".to_string()), (100, "Central".to_string())];
    let summaries = aggregate_markets(&markets, &day, ActiveRule::LiveSessions);

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].market_id, 200);
    assert_eq!(summaries[0].active_employees, 0);
    assert_eq!(summaries[0].stall_confirmations_count, 0);
    assert_eq!(summaries[0].last_upload_time, None);
    assert_eq!(summaries[1], aggregate(100, "Central", &day, ActiveRule::LiveSessions));
}

// ---------------------------------------------------------------------------
// Session status resolver
// ---------------------------------------------------------------------------

fn all_review_done() -> TaskCompletion {
    TaskCompletion::from_flags(Checklist::SESSION_REVIEW.kinds.iter().map(|k| (*k, true)))
}

#[test]
fn frozen_sessions_show_only_their_stored_status() {
    let today = d("2025-06-10");
    for (status, label) in [
        (SessionStatus::Finalized, StatusLabel::Finalized),
        (SessionStatus::Locked, StatusLabel::Locked),
    ] {
        let s = session(1, 10, 100, DAY, Some(ist(DAY, "09:00")), None, status);
        let labels = resolve_statuses(&s, &TaskCompletion::from_flags([]), today);
        assert_eq!(labels.len(), 1);
        assert!(labels.contains(label));
    }
}

#[test]
fn past_incomplete_session_is_expired_and_incomplete() {
    let s = session(1, 10, 100, DAY, Some(ist(DAY, "09:00")), None, SessionStatus::Active);
    let labels = resolve_statuses(&s, &all_review_done(), d("2025-06-02"));

    assert!(labels.contains(StatusLabel::Expired));
    assert!(labels.contains(StatusLabel::Incomplete));
    assert_eq!(labels.to_string(), "expired,incomplete");
}

#[test]
fn completed_needs_all_tasks_and_punch_out() {
    let out = Some(ist(DAY, "17:00"));
    let done = session(1, 10, 100, DAY, Some(ist(DAY, "09:00")), out, SessionStatus::Completed);
    let labels = resolve_statuses(&done, &all_review_done(), d("2025-06-05"));
    assert_eq!(labels.len(), 1);
    assert!(labels.contains(StatusLabel::Completed));

    let mut partial = all_review_done().flags().clone();
    partial.insert(TaskKind::AttendanceSelfie, false);
    let labels = resolve_statuses(&done, &TaskCompletion::from_flags(partial), d(DAY));
    assert_eq!(labels.len(), 1);
    assert!(labels.contains(StatusLabel::Incomplete));
}

#[test]
fn resolved_labels_are_never_empty() {
    let statuses = [
        SessionStatus::Active,
        SessionStatus::Completed,
        SessionStatus::Finalized,
        SessionStatus::Locked,
    ];
    let completions = [TaskCompletion::from_flags([]), all_review_done()];
    let punch_outs = [None, Some(ist(DAY, "17:00"))];
    let todays = [d("2025-05-31"), d(DAY), d("2025-06-02")];

    for status in statuses {
        for completion in &completions {
            for out in punch_outs {
                for today in todays {
                    let s = session(1, 10, 100, DAY, Some(ist(DAY, "09:00")), out, status);
                    let labels = resolve_statuses(&s, completion, today);
                    assert!(!labels.is_empty());
                    if status.is_frozen() {
                        assert_eq!(labels.len(), 1);
                    }
                }
            }
        }
    }
}
