use chrono::{TimeZone, Utc};
use rusqlite::TransactionBehavior;
use rattendance::core::checkin::CheckInLogic;
use rattendance::core::clubs::ClubLogic;
use rattendance::core::geofence::DEFAULT_RADIUS_M;
use rattendance::core::members::MemberLogic;
use rattendance::core::session::SessionLogic;
use rattendance::db::pool::DbPool;
use rattendance::errors::AppError;
use rattendance::models::coordinates::Coordinates;
use rattendance::models::identity::Identity;
use rattendance::models::outcome::CheckInOutcome;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

mod common;
use common::open_test_pool;

fn origin() -> Coordinates {
    Coordinates::new(0.0, 0.0).unwrap()
}

fn email(s: &str) -> Identity {
    Identity::email(s).unwrap()
}

/// Club "chess" with alice (admin) and bob (member).
fn chess_club(name: &str) -> DbPool {
    let mut pool = open_test_pool(name);
    ClubLogic::create(&mut pool, "chess").unwrap();
    MemberLogic::register(&mut pool, "chess", &email("alice@example.org"), "Alice").unwrap();
    MemberLogic::register(&mut pool, "chess", &email("bob@example.org"), "Bob").unwrap();
    MemberLogic::set_admin(&mut pool, "chess", &email("alice@example.org"), true).unwrap();
    pool
}

fn check_in_at(pool: &mut DbPool, who: &str, lat: f64, lon: f64) -> CheckInOutcome {
    CheckInLogic::check_in(
        pool,
        "chess",
        &email(who),
        Coordinates::new(lat, lon).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap(),
        DEFAULT_RADIUS_M,
    )
    .unwrap()
}

#[test]
fn test_first_toggle_opens_the_session() {
    let mut pool = chess_club("logic_first_toggle");

    let open = SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin())
        .unwrap();
    assert!(open);
    assert!(SessionLogic::query(&mut pool, "chess").unwrap());

    let snap = SessionLogic::snapshot(&mut pool, "chess").unwrap();
    assert_eq!(snap.anchor, origin());
}

#[test]
fn test_toggling_twice_restores_the_flag() {
    let mut pool = chess_club("logic_toggle_twice");
    let admin = email("alice@example.org");

    SessionLogic::toggle(&mut pool, "chess", &admin, origin()).unwrap();
    let before = SessionLogic::query(&mut pool, "chess").unwrap();

    SessionLogic::toggle(&mut pool, "chess", &admin, origin()).unwrap();
    SessionLogic::toggle(&mut pool, "chess", &admin, origin()).unwrap();

    assert_eq!(SessionLogic::query(&mut pool, "chess").unwrap(), before);
}

#[test]
fn test_each_toggle_overwrites_the_anchor() {
    let mut pool = chess_club("logic_reanchor");
    let admin = email("alice@example.org");
    let milan = Coordinates::new(45.4642, 9.19).unwrap();

    SessionLogic::toggle(&mut pool, "chess", &admin, origin()).unwrap();
    SessionLogic::toggle(&mut pool, "chess", &admin, origin()).unwrap();
    SessionLogic::toggle(&mut pool, "chess", &admin, milan).unwrap();

    let snap = SessionLogic::snapshot(&mut pool, "chess").unwrap();
    assert!(snap.accepting);
    assert_eq!(snap.anchor, milan);
}

#[test]
fn test_non_admin_toggle_is_forbidden_and_changes_nothing() {
    let mut pool = chess_club("logic_non_admin");

    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    let far = Coordinates::new(10.0, 10.0).unwrap();
    let err = SessionLogic::toggle(&mut pool, "chess", &email("bob@example.org"), far)
        .unwrap_err();
    assert!(matches!(err, AppError::Permission(_)));
    assert_eq!(err.status(), "forbidden");

    let snap = SessionLogic::snapshot(&mut pool, "chess").unwrap();
    assert!(snap.accepting);
    assert_eq!(snap.anchor, origin());
}

#[test]
fn test_stranger_toggle_is_forbidden() {
    let mut pool = chess_club("logic_stranger_toggle");
    let err = SessionLogic::toggle(&mut pool, "chess", &email("eve@example.org"), origin())
        .unwrap_err();
    assert!(matches!(err, AppError::Permission(_)));
    assert!(matches!(
        SessionLogic::query(&mut pool, "chess"),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_toggle_on_unknown_club_is_not_found() {
    let mut pool = chess_club("logic_toggle_unknown_club");
    let err = SessionLogic::toggle(&mut pool, "go", &email("alice@example.org"), origin())
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_query_before_first_toggle_is_not_found() {
    let mut pool = chess_club("logic_query_before_toggle");
    let err = SessionLogic::query(&mut pool, "chess").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn test_check_in_at_anchor_is_accepted() {
    let mut pool = chess_club("logic_checkin_anchor");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    match check_in_at(&mut pool, "bob@example.org", 0.0, 0.0) {
        CheckInOutcome::Accepted { member, distance_m } => {
            assert_eq!(distance_m, 0.0);
            assert_eq!(member.attendance, 1);
            assert_eq!(member.last_check_in.as_deref(), Some("2026-03-14T18:30:00Z"));
        }
        other => panic!("expected Accepted, got {:?}", other),
    }
}

#[test]
fn test_check_in_111m_away_is_rejected_without_mutation() {
    let mut pool = chess_club("logic_checkin_far");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    let outcome = check_in_at(&mut pool, "bob@example.org", 0.0, 0.001);
    match outcome {
        CheckInOutcome::Rejected {
            distance_m,
            radius_m,
        } => {
            assert!(distance_m > 50.0);
            assert!((distance_m - 111.195).abs() < 0.01);
            assert_eq!(radius_m, DEFAULT_RADIUS_M);
        }
        other => panic!("expected Rejected, got {:?}", other),
    }

    let bob = MemberLogic::resolve(&mut pool, "chess", &email("bob@example.org")).unwrap();
    assert_eq!(bob.attendance, 0);
    assert_eq!(bob.last_check_in, None);
}

#[test]
fn test_rejection_does_not_require_membership() {
    let mut pool = chess_club("logic_reject_stranger");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    let outcome = check_in_at(&mut pool, "eve@example.org", 1.0, 1.0);
    assert!(matches!(outcome, CheckInOutcome::Rejected { .. }));
}

#[test]
fn test_check_in_inside_fence_by_non_member_is_not_found() {
    let mut pool = chess_club("logic_checkin_stranger");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    let err = CheckInLogic::check_in(
        &mut pool,
        "chess",
        &email("eve@example.org"),
        origin(),
        Utc::now(),
        DEFAULT_RADIUS_M,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_check_in_without_session_is_not_found() {
    let mut pool = chess_club("logic_checkin_no_session");
    let err = CheckInLogic::check_in(
        &mut pool,
        "chess",
        &email("bob@example.org"),
        origin(),
        Utc::now(),
        DEFAULT_RADIUS_M,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_check_in_unknown_club_is_not_found() {
    let mut pool = chess_club("logic_checkin_no_club");
    let err = CheckInLogic::check_in(
        &mut pool,
        "go",
        &email("bob@example.org"),
        origin(),
        Utc::now(),
        DEFAULT_RADIUS_M,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_check_in_while_closed_is_a_closed_outcome() {
    let mut pool = chess_club("logic_checkin_closed");
    let admin = email("alice@example.org");
    SessionLogic::toggle(&mut pool, "chess", &admin, origin()).unwrap();
    SessionLogic::toggle(&mut pool, "chess", &admin, origin()).unwrap();

    let outcome = check_in_at(&mut pool, "bob@example.org", 0.0, 0.0);
    assert_eq!(outcome, CheckInOutcome::Closed);

    let bob = MemberLogic::resolve(&mut pool, "chess", &email("bob@example.org")).unwrap();
    assert_eq!(bob.attendance, 0);
}

#[test]
fn test_check_in_keeps_sub_second_timestamp() {
    let mut pool = chess_club("logic_checkin_millis");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    let at = Utc
        .with_ymd_and_hms(2026, 3, 14, 18, 30, 5)
        .unwrap()
        .checked_add_signed(chrono::Duration::milliseconds(250))
        .unwrap();
    let outcome = CheckInLogic::check_in(
        &mut pool,
        "chess",
        &email("bob@example.org"),
        origin(),
        at,
        DEFAULT_RADIUS_M,
    )
    .unwrap();

    match outcome {
        CheckInOutcome::Accepted { member, .. } => {
            assert_eq!(
                member.last_check_in.as_deref(),
                Some("2026-03-14T18:30:05.250Z")
            );
        }
        other => panic!("expected Accepted, got {:?}", other),
    }
}

#[test]
fn test_check_in_waits_for_a_concurrent_close() {
    let mut pool = chess_club("logic_checkin_concurrent_close");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();
    let db_path = pool.conn.path().unwrap().to_string();

    // another connection closes the session and holds the write lock for a while
    let (locked, wait_locked) = mpsc::channel();
    let closer = thread::spawn(move || {
        let mut other = DbPool::new(&db_path).unwrap();
        let tx = other
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .unwrap();
        tx.execute("UPDATE session_states SET accepting = 0", [])
            .unwrap();
        locked.send(()).unwrap();
        thread::sleep(Duration::from_millis(300));
        tx.commit().unwrap();
    });

    wait_locked.recv().unwrap();
    let outcome = check_in_at(&mut pool, "bob@example.org", 0.0, 0.0);
    closer.join().unwrap();

    assert_eq!(outcome, CheckInOutcome::Closed);
    let bob = MemberLogic::resolve(&mut pool, "chess", &email("bob@example.org")).unwrap();
    assert_eq!(bob.attendance, 0);
    assert_eq!(bob.last_check_in, None);
}

#[test]
fn test_attendance_counter_never_decreases() {
    let mut pool = chess_club("logic_monotonic");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    let points = [(0.0, 0.0), (0.0, 0.001), (0.0002, 0.0), (5.0, 5.0), (0.0, 0.0001)];
    let mut last = 0;
    for (lat, lon) in points {
        check_in_at(&mut pool, "bob@example.org", lat, lon);
        let now = MemberLogic::resolve(&mut pool, "chess", &email("bob@example.org"))
            .unwrap()
            .attendance;
        assert!(now >= last);
        last = now;
    }
    // (0,0), (0.0002,0) ≈ 22 m and (0,0.0001) ≈ 11 m are inside
    assert_eq!(last, 3);
}

#[test]
fn test_repeated_check_ins_in_one_window_all_count() {
    let mut pool = chess_club("logic_repeat_checkin");
    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    for _ in 0..3 {
        check_in_at(&mut pool, "bob@example.org", 0.0, 0.0);
    }
    let bob = MemberLogic::resolve(&mut pool, "chess", &email("bob@example.org")).unwrap();
    assert_eq!(bob.attendance, 3);
}

#[test]
fn test_session_state_is_per_club() {
    let mut pool = chess_club("logic_per_club");
    ClubLogic::create(&mut pool, "go").unwrap();
    MemberLogic::register(&mut pool, "go", &email("alice@example.org"), "Alice").unwrap();
    MemberLogic::set_admin(&mut pool, "go", &email("alice@example.org"), true).unwrap();

    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();

    assert!(SessionLogic::query(&mut pool, "chess").unwrap());
    assert!(matches!(
        SessionLogic::query(&mut pool, "go"),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_duplicate_registration_is_a_conflict() {
    let mut pool = chess_club("logic_duplicate_member");
    let err = MemberLogic::register(&mut pool, "chess", &email("BOB@example.org"), "Bobby")
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.exit_code(), 6);
}

#[test]
fn test_same_identity_may_join_two_clubs() {
    let mut pool = chess_club("logic_two_clubs");
    ClubLogic::create(&mut pool, "go").unwrap();
    let m = MemberLogic::register(&mut pool, "go", &email("bob@example.org"), "Bob").unwrap();
    assert_eq!(m.attendance, 0);
    assert!(!m.is_admin);
}

#[test]
fn test_duplicate_club_is_a_conflict() {
    let mut pool = chess_club("logic_duplicate_club");
    assert!(matches!(
        ClubLogic::create(&mut pool, " chess "),
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        ClubLogic::create(&mut pool, "   "),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn test_club_overview_counts_members() {
    let mut pool = chess_club("logic_overview");
    let o = ClubLogic::overview(&mut pool, "chess").unwrap();
    assert_eq!(o.members, 2);
    assert_eq!(o.admins, 1);
    assert_eq!(o.accepting, None);

    SessionLogic::toggle(&mut pool, "chess", &email("alice@example.org"), origin()).unwrap();
    let o = ClubLogic::overview(&mut pool, "chess").unwrap();
    assert_eq!(o.accepting, Some(true));
}

#[test]
fn test_batch_import_is_all_or_nothing() {
    let mut pool = chess_club("logic_batch");

    let ok_file = std::env::temp_dir().join("logic_batch_ok.csv");
    std::fs::write(
        &ok_file,
        "name,identity\nCarol,carol@example.org\nDan, +39 333 765 4321\n",
    )
    .unwrap();
    let created = MemberLogic::register_batch(&mut pool, "chess", &ok_file).unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].identity, Identity::Phone("+393337654321".into()));

    let dup_file = std::env::temp_dir().join("logic_batch_dup.csv");
    std::fs::write(
        &dup_file,
        "name,identity\nErin,erin@example.org\nBob again,bob@example.org\n",
    )
    .unwrap();
    let err = MemberLogic::register_batch(&mut pool, "chess", &dup_file).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Erin was rolled back with the rest of the batch
    assert!(matches!(
        MemberLogic::resolve(&mut pool, "chess", &email("erin@example.org")),
        Err(AppError::NotFound(_))
    ));
    assert_eq!(MemberLogic::list(&mut pool, "chess").unwrap().len(), 4);
}

#[test]
fn test_revoked_admin_can_no_longer_toggle() {
    let mut pool = chess_club("logic_revoke");
    let alice = email("alice@example.org");
    MemberLogic::set_admin(&mut pool, "chess", &alice, false).unwrap();

    assert!(matches!(
        SessionLogic::toggle(&mut pool, "chess", &alice, origin()),
        Err(AppError::Permission(_))
    ));
}
