//! End-to-end engine scenarios
//!
//! Every scenario runs against in-memory storage and scripted collaborators;
//! no network or database is involved.

use chrono::Duration;

use clan_core::entities::StatusTier;
use clan_core::error::DomainError;
use clan_core::traits::{ApiResponse, ChatIdentity};
use clan_core::value_objects::{ChatUserId, ClanId, GameAccountId, MembershipType};
use clan_engine::services::{EngineError, RegistrationService, ReportService};
use clan_engine::{Engine, SchedulePeriods};

use integration_tests::helpers::{
    at_noon, day, day_stat, entry, group, harness, message, page, record, report, steam,
    steam_profile, CLAN_A, CLAN_B,
};

// ============================================================================
// Scoring end-to-end
// ============================================================================

#[tokio::test]
async fn test_end_to_end_worked_example() {
    let h = harness(3);
    let today = day(2026, 8, 7);

    // Two frozen historical buckets
    let mut member = record(1, 1001, CLAN_A);
    member
        .game_activity
        .insert(day(2026, 8, 5), day_stat(day(2026, 8, 5), 3600, 1.0, 1));
    member
        .game_activity
        .insert(day(2026, 8, 6), day_stat(day(2026, 8, 6), 1800, 0.0, 0));
    h.members.seed(member);

    // Today resolves but has no sessions
    h.api
        .set_profile(steam(), GameAccountId::new(1001), steam_profile("Ace", &[11]));

    // 10 messages x 50 characters inside the window
    h.chat.add_role_member(ChatUserId::new(1), "ace");
    h.chat.add_channel(
        1,
        (0..10)
            .map(|_| message(1, 50, at_noon(day(2026, 8, 6))))
            .collect(),
    );

    let summary = h.refresh.refresh_activity_at(today).await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);

    let updated = h.members.get(ChatUserId::new(1)).unwrap();
    assert_eq!(updated.chat_stats.chat_events, 10);
    assert_eq!(updated.chat_stats.characters_typed, 500);

    // 5400 + 10*60 + 500*3*2.0 = 9000
    assert_eq!(updated.activity_score, 9000);
    assert_eq!(updated.status_tier, StatusTier::Inactive);

    // Window fully materialized, today provisional and zero
    assert_eq!(updated.game_activity.len(), 3);
    assert!(updated.game_activity[&today].is_zero());
}

#[tokio::test]
async fn test_historical_days_are_never_refetched() {
    let h = harness(3);
    let today = day(2026, 8, 7);

    let mut member = record(1, 1001, CLAN_A);
    let cached_five = day_stat(day(2026, 8, 5), 3600, 1.0, 1);
    let cached_six = day_stat(day(2026, 8, 6), 1800, 0.0, 0);
    member.game_activity.insert(cached_five.date, cached_five.clone());
    member.game_activity.insert(cached_six.date, cached_six.clone());
    // A bucket that fell out of the window gets pruned
    member
        .game_activity
        .insert(day(2026, 7, 1), day_stat(day(2026, 7, 1), 99, 0.0, 0));
    h.members.seed(member);

    h.api
        .set_profile(steam(), GameAccountId::new(1001), steam_profile("Ace", &[11]));

    h.refresh.refresh_activity_at(today).await.unwrap();

    // Only today was fetched: one profile probe, one (empty) history page
    assert_eq!(h.api.profile_call_count(), 1);
    assert_eq!(h.api.page_call_count(), 1);

    let updated = h.members.get(ChatUserId::new(1)).unwrap();
    assert_eq!(updated.game_activity[&cached_five.date], cached_five);
    assert_eq!(updated.game_activity[&cached_six.date], cached_six);
    assert!(!updated.game_activity.contains_key(&day(2026, 7, 1)));
}

#[tokio::test]
async fn test_session_weight_capped_at_2_9() {
    let h = harness(1);
    let today = day(2026, 8, 7);

    h.install_roster(CLAN_A, "Ace's Brew", &(1..=10).collect::<Vec<_>>());
    h.members.seed(record(2, 2002, CLAN_A));

    h.api
        .set_profile(steam(), GameAccountId::new(2002), steam_profile("Capped", &[21]));
    h.api.set_page(
        GameAccountId::new(2002),
        21,
        0,
        page(vec![entry(900, at_noon(today), 1200)]),
    );
    h.api
        .set_report(900, report(&(1..=10).collect::<Vec<_>>()));

    let summary = h.refresh.refresh_activity_at(today).await.unwrap();
    assert_eq!(summary.updated, 1);

    let updated = h.members.get(ChatUserId::new(2)).unwrap();
    let bucket = &updated.game_activity[&today];
    assert_eq!(bucket.seconds_played, 1200);
    assert!((bucket.clan_members_played_with - 2.9).abs() < f64::EPSILON);
    // The unique accumulator carries the true count
    assert_eq!(bucket.unique_clan_members_played_with, 10);
    assert_eq!(h.api.report_call_count(), 1);
}

#[tokio::test]
async fn test_privacy_restricted_profile_yields_zero_bucket() {
    let h = harness(1);
    let today = day(2026, 8, 7);

    h.members.seed(record(3, 3003, CLAN_A));
    for membership_type in MembershipType::PROBE_ORDER {
        h.api.set_profile(
            membership_type,
            GameAccountId::new(3003),
            ApiResponse::failure(1665, "PrivacyRestriction"),
        );
    }

    // A business outcome, not a fault: the cycle succeeds
    let summary = h.refresh.refresh_activity_at(today).await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);

    let updated = h.members.get(ChatUserId::new(3)).unwrap();
    assert!(updated.game_activity[&today].is_zero());
}

// ============================================================================
// Pagination termination
// ============================================================================

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    let h = harness(1);
    let target = day(2026, 8, 1);
    let account = GameAccountId::new(4001);

    h.api.set_profile(steam(), account, steam_profile("A", &[31]));
    h.api.set_page(
        account,
        31,
        0,
        page(vec![
            entry(101, at_noon(target), 600),
            entry(102, at_noon(target) - Duration::hours(2), 300),
        ]),
    );
    // Page 1 is unscripted and comes back empty

    let activity = h.ctx.fetcher().fetch_day(account, target).await.unwrap();
    assert_eq!(activity.sessions.len(), 2);
    assert!(!activity.privacy_restricted);
    assert_eq!(h.api.page_call_count(), 2);
}

#[tokio::test]
async fn test_pagination_stops_when_page_predates_target() {
    let h = harness(1);
    let target = day(2026, 8, 1);
    let account = GameAccountId::new(4002);

    h.api.set_profile(steam(), account, steam_profile("B", &[32]));
    // Newest-first: one session on the target day, then one older
    h.api.set_page(
        account,
        32,
        0,
        page(vec![
            entry(201, at_noon(target), 600),
            entry(202, at_noon(target - Duration::days(1)), 999),
        ]),
    );

    let activity = h.ctx.fetcher().fetch_day(account, target).await.unwrap();
    assert_eq!(activity.sessions.len(), 1);
    assert_eq!(activity.sessions[0].instance_id, 201);
    // The older entry ended the scan; page 1 was never requested
    assert_eq!(h.api.page_call_count(), 1);
}

#[tokio::test]
async fn test_pagination_stops_on_privacy_code() {
    let h = harness(1);
    let target = day(2026, 8, 1);
    let account = GameAccountId::new(4003);

    h.api.set_profile(steam(), account, steam_profile("C", &[33]));
    h.api.set_page(
        account,
        33,
        0,
        ApiResponse::failure(1665, "PrivacyRestriction"),
    );

    let activity = h.ctx.fetcher().fetch_day(account, target).await.unwrap();
    assert!(activity.privacy_restricted);
    assert!(activity.sessions.is_empty());
    assert_eq!(h.api.page_call_count(), 1);
}

#[tokio::test]
async fn test_all_characters_are_scanned() {
    let h = harness(1);
    let target = day(2026, 8, 1);
    let account = GameAccountId::new(4004);

    h.api
        .set_profile(steam(), account, steam_profile("D", &[41, 42]));
    h.api
        .set_page(account, 41, 0, page(vec![entry(301, at_noon(target), 100)]));
    h.api
        .set_page(account, 42, 0, page(vec![entry(302, at_noon(target), 200)]));

    let activity = h.ctx.fetcher().fetch_day(account, target).await.unwrap();
    assert_eq!(activity.sessions.len(), 2);
}

// ============================================================================
// Roster refresh and eviction
// ============================================================================

#[tokio::test]
async fn test_eviction_removes_exactly_the_departed_member() {
    let h = harness(3);
    h.members.seed(record(10, 1, CLAN_A));
    h.members.seed(record(11, 2, CLAN_A));
    h.members.seed(record(12, 3, CLAN_A));

    // Member with game id 2 is gone from the fresh roster
    h.api.set_group(ClanId::new(CLAN_A), group(&[1, 3]));
    h.api.set_group(ClanId::new(CLAN_B), group(&[]));

    h.refresh.refresh_rosters().await.unwrap();

    assert_eq!(h.members.len(), 2);
    assert!(h.members.get(ChatUserId::new(10)).is_some());
    assert!(h.members.get(ChatUserId::new(11)).is_none());
    assert!(h.members.get(ChatUserId::new(12)).is_some());

    let counts = h.ctx.roster_cache().counts();
    assert_eq!(counts["Ace's Brew"], 2);
    assert_eq!(counts["Ace's Brew II"], 0);
}

#[tokio::test]
async fn test_eviction_skipped_when_any_roster_refresh_fails() {
    let h = harness(3);
    h.members.seed(record(10, 1, CLAN_A));
    h.members.seed(record(11, 2, CLAN_A));

    // Clan A refreshes without member 2; clan B's refresh fails outright
    h.api.set_group(ClanId::new(CLAN_A), group(&[1]));
    // CLAN_B is unscripted and returns a generic failure envelope

    h.refresh.refresh_rosters().await.unwrap();

    // Nobody is evicted off a partial union
    assert_eq!(h.members.len(), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let h = harness(3);
    h.install_roster(CLAN_A, "Ace's Brew", &[1, 2, 3]);

    // Both refreshes fail (unscripted); the stale snapshot must survive
    h.refresh.refresh_rosters().await.unwrap();

    assert!(h
        .ctx
        .roster_cache()
        .is_member(GameAccountId::new(2))
        .is_some());
}

// ============================================================================
// Fault isolation
// ============================================================================

#[tokio::test]
async fn test_one_failing_member_does_not_abort_the_batch() {
    let h = harness(1);
    let today = day(2026, 8, 7);

    h.members.seed(record(20, 5001, CLAN_A));
    h.members.seed(record(21, 5002, CLAN_A));

    h.api.fail_profile_transport(GameAccountId::new(5001));
    h.api
        .set_profile(steam(), GameAccountId::new(5002), steam_profile("Ok", &[51]));

    let summary = h.refresh.refresh_activity_at(today).await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 1);

    // The healthy member was reconciled and persisted
    let healthy = h.members.get(ChatUserId::new(21)).unwrap();
    assert_eq!(healthy.game_activity.len(), 1);

    // The failing member's record is untouched
    let failing = h.members.get(ChatUserId::new(20)).unwrap();
    assert!(failing.game_activity.is_empty());
}

#[tokio::test]
async fn test_corrupt_record_is_skipped_and_never_deleted() {
    let h = harness(1);
    let today = day(2026, 8, 7);

    h.members.seed(record(30, 6001, CLAN_A));
    h.members.seed(record(31, 6002, CLAN_A));
    h.members.mark_corrupt(ChatUserId::new(30));

    h.api
        .set_profile(steam(), GameAccountId::new(6002), steam_profile("Ok", &[61]));

    let summary = h.refresh.refresh_activity_at(today).await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(h.members.len(), 2);

    // Eviction must not delete the unreadable record either, even though its
    // game id cannot be matched against the roster union
    h.api.set_group(ClanId::new(CLAN_A), group(&[6002]));
    h.api.set_group(ClanId::new(CLAN_B), group(&[]));
    h.refresh.refresh_rosters().await.unwrap();
    assert_eq!(h.members.len(), 2);
}

#[tokio::test]
async fn test_chat_outage_keeps_previous_counters() {
    let h = harness(1);
    let today = day(2026, 8, 7);

    let mut member = record(40, 7001, CLAN_A);
    member.chat_stats.chat_events = 5;
    member.chat_stats.characters_typed = 100;
    h.members.seed(member);

    h.api
        .set_profile(steam(), GameAccountId::new(7001), steam_profile("Ok", &[71]));
    h.chat.set_unavailable(true);

    let summary = h.refresh.refresh_activity_at(today).await.unwrap();
    assert_eq!(summary.updated, 1);

    let updated = h.members.get(ChatUserId::new(40)).unwrap();
    assert_eq!(updated.chat_stats.chat_events, 5);
    assert_eq!(updated.chat_stats.characters_typed, 100);
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_registration_flow_and_duplicates() {
    let h = harness(3);
    h.install_roster(CLAN_A, "Ace's Brew", &[42]);
    h.api
        .set_profile(steam(), GameAccountId::new(42), steam_profile("Ace-1337", &[1]));

    let service = RegistrationService::new(&h.ctx);

    let created = service
        .register(
            ChatIdentity {
                id: ChatUserId::new(7),
                display_name: "ace".to_string(),
            },
            GameAccountId::new(42),
        )
        .await
        .unwrap();
    assert_eq!(created.game_name, "Ace-1337");
    assert_eq!(created.clan_id, ClanId::new(CLAN_A));
    assert_eq!(created.activity_score, 0);

    // Same chat identity again
    let err = service
        .register(
            ChatIdentity {
                id: ChatUserId::new(7),
                display_name: "ace".to_string(),
            },
            GameAccountId::new(42),
        )
        .await
        .unwrap_err();
    match err {
        EngineError::Domain(e) => assert!(e.is_duplicate_registration()),
        other => panic!("unexpected error: {other}"),
    }

    // Different chat identity, same game account
    let err = service
        .register(
            ChatIdentity {
                id: ChatUserId::new(8),
                display_name: "bob".to_string(),
            },
            GameAccountId::new(42),
        )
        .await
        .unwrap_err();
    match err {
        EngineError::Domain(e) => assert!(e.is_duplicate_registration()),
        other => panic!("unexpected error: {other}"),
    }

    // The original record survived both rejections
    assert_eq!(h.members.len(), 1);
    assert_eq!(
        h.members.get(ChatUserId::new(7)).unwrap().chat_name,
        "ace"
    );
}

#[tokio::test]
async fn test_registration_requires_roster_membership() {
    let h = harness(3);
    h.install_roster(CLAN_A, "Ace's Brew", &[42]);

    let service = RegistrationService::new(&h.ctx);
    let err = service
        .register(
            ChatIdentity {
                id: ChatUserId::new(9),
                display_name: "carol".to_string(),
            },
            GameAccountId::new(99),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Domain(DomainError::RosterMembershipRequired)
    ));
    assert!(err.user_message().contains("clan rosters"));
    assert!(h.members.is_empty());
}

#[tokio::test]
async fn test_roster_name_lookup_for_preregistration() {
    let h = harness(3);
    h.install_roster(CLAN_A, "Ace's Brew", &[42]);

    let service = RegistrationService::new(&h.ctx);
    let hit = service.find_roster_member("MEMBER_42").unwrap();
    assert_eq!(hit.member.account_id, GameAccountId::new(42));
    assert!(service.find_roster_member("nobody").is_none());
}

// ============================================================================
// Reports and command surface
// ============================================================================

#[tokio::test]
async fn test_get_report_by_id_and_name() {
    let h = harness(3);
    h.members.seed(record(30, 7001, CLAN_A));

    let service = ReportService::new(&h.ctx);

    assert!(service.get_report("30").await.is_ok());
    assert!(service.get_report("CHAT_30").await.is_ok());
    assert!(service.get_report("game_7001").await.is_ok());

    let err = service.get_report("nobody").await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Domain(DomainError::NotRegistered(_))
    ));
    assert!(err.user_message().contains("not registered"));
}

#[tokio::test]
async fn test_force_refresh_single_member() {
    let h = harness(2);
    h.members.seed(record(50, 8001, CLAN_A));
    h.api
        .set_profile(steam(), GameAccountId::new(8001), steam_profile("Solo", &[81]));

    h.refresh.force_refresh(Some("chat_50")).await.unwrap();

    // Window materialized for both days of the 2-day window
    let updated = h.members.get(ChatUserId::new(50)).unwrap();
    assert_eq!(updated.game_activity.len(), 2);

    let err = h.refresh.force_refresh(Some("nobody")).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Domain(DomainError::NotRegistered(_))
    ));
}

#[tokio::test]
async fn test_name_refresh_updates_both_names() {
    let h = harness(2);
    h.members.seed(record(60, 9001, CLAN_A));
    h.chat.set_name(ChatUserId::new(60), "shiny");
    h.api
        .set_profile(steam(), GameAccountId::new(9001), steam_profile("NewTag", &[91]));

    h.refresh.refresh_names().await.unwrap();

    let updated = h.members.get(ChatUserId::new(60)).unwrap();
    assert_eq!(updated.chat_name, "shiny");
    assert_eq!(updated.game_name, "NewTag");
}

// ============================================================================
// Engine lifecycle
// ============================================================================

#[tokio::test]
async fn test_engine_seeds_roster_cache_and_shuts_down_cleanly() {
    let h = harness(2);
    h.rosters
        .seed(integration_tests::helpers::roster(CLAN_A, "Ace's Brew", &[1, 2]));

    let mut engine = Engine::with_context(h.ctx.clone(), SchedulePeriods::default());
    engine.start().await.unwrap();

    // Seeded snapshot is queryable before any remote refresh succeeded
    let counts = engine.roster_counts();
    assert_eq!(counts["Ace's Brew"], 2);

    engine.shutdown().await;
}
