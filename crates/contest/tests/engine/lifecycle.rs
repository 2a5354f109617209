use crate::helpers::{
    coordinator_with, seed_entrants, test_engine, MockPresenterClient, RecordingPresenter,
    TEST_CHANNEL, TEST_HOST,
};
use anyhow::anyhow;
use contest::{ChannelRegistry, ContestError, InMemoryEntrySource};
use contest_core::{ActorId, ChannelRef, ContestId, ContestState};
use maplit::hashset;
use std::{collections::HashSet, sync::Arc, time::Duration};
use time::OffsetDateTime;
use tokio_test::assert_ok;

#[tokio::test]
async fn create_parses_raw_command_input() {
    let engine = test_engine();

    let contest = engine
        .coordinator
        .create_contest(
            ContestId(1),
            TEST_CHANNEL,
            TEST_HOST,
            "2h",
            "3",
            "Platinum Membership",
        )
        .await
        .unwrap();

    assert_eq!(contest.state, ContestState::Active);
    assert_eq!(contest.winner_count, 3);
    assert_eq!(contest.prize, "Platinum Membership");

    let window = contest.end_at - contest.created_at;
    assert_eq!(window.whole_seconds(), 7_200);
}

#[tokio::test]
async fn create_rejects_bad_input_without_mutation() {
    let engine = test_engine();

    let bad_inputs = [
        ("10x", "3"),
        ("abc", "3"),
        ("-5m", "3"),
        ("10", "3"),
        ("0s", "3"),
        ("1h", "0"),
        ("1h", "21"),
        ("1h", "three"),
        // Parses cleanly but the end time would fall past the date range.
        ("9300000000000000000s", "3"),
        ("300000000000d", "3"),
    ];

    for (duration, winners) in bad_inputs {
        let err = engine
            .coordinator
            .create_contest(
                ContestId(1),
                TEST_CHANNEL,
                TEST_HOST,
                duration,
                winners,
                "prize",
            )
            .await
            .unwrap_err();
        assert!(
            matches!(err, ContestError::InvalidArgument(_)),
            "expected ({duration:?}, {winners:?}) to be rejected, got {err:?}"
        );
    }

    assert_eq!(engine.coordinator.contest_store.count().await, 0);
}

#[tokio::test]
async fn create_respects_channel_restrictions() {
    let entry_source = Arc::new(InMemoryEntrySource::new());
    let coordinator = coordinator_with(
        entry_source,
        Arc::new(RecordingPresenter::default()),
        Arc::new(ChannelRegistry::with_allowed([ChannelRef(42)])),
        Duration::from_secs(5),
    );

    let err = coordinator
        .create_contest(ContestId(1), ChannelRef(7), TEST_HOST, "1h", "1", "prize")
        .await
        .unwrap_err();
    assert!(matches!(err, ContestError::ChannelRestricted(_)));

    assert_ok!(
        coordinator
            .create_contest(ContestId(1), ChannelRef(42), TEST_HOST, "1h", "1", "prize")
            .await
    );
}

#[tokio::test]
async fn end_draws_winners_from_entrants() {
    let engine = test_engine();
    let id = ContestId(10);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "3", "prize")
        .await
        .unwrap();
    seed_entrants(&engine.entry_source, id, 0..10).await;

    let result = engine.coordinator.end_contest(id).await.unwrap();

    assert_eq!(result.winners.len(), 3);
    let distinct: HashSet<ActorId> = result.winners.iter().copied().collect();
    assert_eq!(distinct.len(), 3);
    assert!(result.winners.iter().all(|w| w.0 < 10));

    let contest = engine.coordinator.get_contest(id).await.unwrap();
    assert_eq!(contest.state, ContestState::Ended);
    assert_eq!(contest.last_winners, result.winners);
    assert!(contest.settled_at.is_some());
    assert_eq!(engine.presenter.settled_count(), 1);
}

#[tokio::test]
async fn everyone_wins_when_entrants_are_scarce() {
    let engine = test_engine();
    let id = ContestId(11);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "5", "prize")
        .await
        .unwrap();
    engine
        .entry_source
        .set_entrants(id, hashset! {ActorId(1), ActorId(2)})
        .await;

    let result = engine.coordinator.end_contest(id).await.unwrap();
    let mut winners = result.winners.clone();
    winners.sort();
    assert_eq!(winners, vec![ActorId(1), ActorId(2)]);
}

#[tokio::test]
async fn zero_entrants_still_settles() {
    let engine = test_engine();
    let id = ContestId(12);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "3", "prize")
        .await
        .unwrap();

    let result = engine.coordinator.end_contest(id).await.unwrap();
    assert!(result.winners.is_empty());

    let contest = engine.coordinator.get_contest(id).await.unwrap();
    assert_eq!(contest.state, ContestState::Ended);
    assert_eq!(engine.presenter.settled_count(), 1);
}

#[tokio::test]
async fn ending_twice_reports_already_ended() {
    let engine = test_engine();
    let id = ContestId(13);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
        .await
        .unwrap();
    engine.coordinator.end_contest(id).await.unwrap();

    let err = engine.coordinator.end_contest(id).await.unwrap_err();
    assert!(matches!(err, ContestError::AlreadyEnded(_)));
    assert_eq!(engine.presenter.settled_count(), 1);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let engine = test_engine();
    let missing = ContestId(404);

    assert!(matches!(
        engine.coordinator.end_contest(missing).await,
        Err(ContestError::NotFound(_))
    ));
    assert!(matches!(
        engine.coordinator.cancel_contest(missing).await,
        Err(ContestError::NotFound(_))
    ));
    assert!(matches!(
        engine.coordinator.reroll_contest(missing, None).await,
        Err(ContestError::NotFound(_))
    ));
}

#[tokio::test]
async fn cancelled_contests_never_settle() {
    let engine = test_engine();
    let id = ContestId(14);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
        .await
        .unwrap();
    engine.coordinator.cancel_contest(id).await.unwrap();
    assert_eq!(engine.presenter.cancelled_count(), 1);

    let err = engine.coordinator.end_contest(id).await.unwrap_err();
    assert!(matches!(
        err,
        ContestError::InvalidState(_, ContestState::Cancelled)
    ));

    let err = engine.coordinator.cancel_contest(id).await.unwrap_err();
    assert!(matches!(err, ContestError::InvalidState(_, _)));
    assert_eq!(engine.presenter.settled_count(), 0);
}

#[tokio::test]
async fn reroll_requires_an_ended_contest() {
    let engine = test_engine();
    let id = ContestId(15);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
        .await
        .unwrap();

    let err = engine.coordinator.reroll_contest(id, None).await.unwrap_err();
    assert!(matches!(
        err,
        ContestError::InvalidState(_, ContestState::Active)
    ));
}

#[tokio::test]
async fn reroll_redraws_without_touching_winner_count() {
    let engine = test_engine();
    let id = ContestId(16);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "3", "prize")
        .await
        .unwrap();
    seed_entrants(&engine.entry_source, id, 0..10).await;
    engine.coordinator.end_contest(id).await.unwrap();

    let result = engine
        .coordinator
        .reroll_contest(id, Some("2"))
        .await
        .unwrap();
    assert_eq!(result.winners.len(), 2);
    assert!(result.winners.iter().all(|w| w.0 < 10));

    let contest = engine.coordinator.get_contest(id).await.unwrap();
    assert_eq!(contest.winner_count, 3, "stored winner count is immutable");
    assert_eq!(contest.last_winners, result.winners);
    assert_eq!(contest.state, ContestState::Ended);
}

#[tokio::test]
async fn reroll_rejects_bad_overrides() {
    let engine = test_engine();
    let id = ContestId(17);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
        .await
        .unwrap();
    engine.coordinator.end_contest(id).await.unwrap();

    for bad in ["0", "21", "two"] {
        let err = engine
            .coordinator
            .reroll_contest(id, Some(bad))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ContestError::InvalidArgument(_)),
            "override {bad:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn rerolls_vary_over_repeated_draws() {
    let engine = test_engine();
    let id = ContestId(18);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
        .await
        .unwrap();
    seed_entrants(&engine.entry_source, id, 0..10).await;
    engine.coordinator.end_contest(id).await.unwrap();

    let mut seen = HashSet::new();
    for _ in 0..100 {
        let result = engine.coordinator.reroll_contest(id, None).await.unwrap();
        assert_eq!(result.winners.len(), 1);
        seen.insert(result.winners[0]);
    }
    assert!(seen.len() > 1, "100 rerolls never changed the winner");
}

#[tokio::test]
async fn list_active_excludes_terminal_states() {
    let engine = test_engine();

    for id in 1..=3u64 {
        engine
            .coordinator
            .create_contest(ContestId(id), TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
            .await
            .unwrap();
    }
    engine.coordinator.end_contest(ContestId(2)).await.unwrap();
    engine.coordinator.cancel_contest(ContestId(3)).await.unwrap();

    let active = engine.coordinator.list_active_contests().await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, ContestId(1));
}

#[tokio::test]
async fn delete_removes_the_contest_entirely() {
    let engine = test_engine();
    let id = ContestId(19);

    engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
        .await
        .unwrap();
    engine.coordinator.delete_contest(id).await.unwrap();

    assert!(matches!(
        engine.coordinator.get_contest(id).await,
        Err(ContestError::NotFound(_))
    ));
    assert_eq!(engine.coordinator.contest_store.count().await, 0);
}

#[tokio::test]
async fn notification_failure_does_not_roll_back_settlement() {
    let entry_source = Arc::new(InMemoryEntrySource::new());
    let mut presenter = MockPresenterClient::new();
    presenter
        .expect_notify_settled()
        .returning(|_, _| Err(anyhow!("channel send failed")));

    let coordinator = coordinator_with(
        entry_source.clone(),
        Arc::new(presenter),
        Arc::new(ChannelRegistry::new()),
        Duration::from_secs(5),
    );

    let id = ContestId(20);
    coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "1d", "1", "prize")
        .await
        .unwrap();
    seed_entrants(&entry_source, id, [1, 2, 3]).await;

    let result = coordinator.end_contest(id).await.unwrap();
    assert_eq!(result.winners.len(), 1);

    let contest = coordinator.get_contest(id).await.unwrap();
    assert_eq!(contest.state, ContestState::Ended);
}

#[tokio::test]
async fn seconds_remaining_clamps_at_zero() {
    let engine = test_engine();
    let id = ContestId(21);

    let contest = engine
        .coordinator
        .create_contest(id, TEST_CHANNEL, TEST_HOST, "30s", "1", "prize")
        .await
        .unwrap();

    let now = OffsetDateTime::now_utc();
    assert!(contest.seconds_remaining(now) <= 30);
    assert_eq!(
        contest.seconds_remaining(now + time::Duration::minutes(5)),
        0
    );
}
