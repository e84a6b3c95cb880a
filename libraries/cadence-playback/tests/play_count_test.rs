//! Play counting: threshold arithmetic, dedup window precedence and the
//! unconditional audit row.


use cadence_core::{types::*, CadenceError};
use cadence_playback::{
    PlayCountPolicy, PlayHistoryRecorder, PlaybackConfig, PlaybackController,
};
use chrono::{Duration, Utc};
use test_helpers::*;

#[tokio::test]
async fn test_threshold_on_forty_second_track() {
    // duration 40s => threshold min(30, 20) = 20s
    let test_db = TestDb::new().await;
    let controller = test_db.controller();
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let track = create_test_track(test_db.pool(), "Short", 40).await;

    let counted = controller
        .record_play(&alice, &track.id, Some(25.0))
        .await
        .unwrap();
    assert!(counted);

    let counted = controller
        .record_play(&bob, &track.id, Some(10.0))
        .await
        .unwrap();
    assert!(!counted);

    assert_eq!(play_count(test_db.pool(), &track.id).await, 1);
}

#[tokio::test]
async fn test_second_play_inside_window_never_counts() {
    let test_db = TestDb::new().await;
    let controller = test_db.controller();
    let user = UserId::new("listener");
    let track = create_test_track(test_db.pool(), "Loop", 200).await;

    assert!(controller
        .record_play(&user, &track.id, Some(200.0))
        .await
        .unwrap());
    assert!(!controller
        .record_play(&user, &track.id, Some(200.0))
        .await
        .unwrap());

    assert_eq!(play_count(test_db.pool(), &track.id).await, 1);

    // Both attempts are in the audit log
    let history = controller.recent_plays(&user, None).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_short_play_still_opens_dedup_window() {
    let test_db = TestDb::new().await;
    let controller = test_db.controller();
    let user = UserId::new("listener");
    let track = create_test_track(test_db.pool(), "Loop", 200).await;

    assert!(!controller
        .record_play(&user, &track.id, Some(1.0))
        .await
        .unwrap());
    assert!(!controller
        .record_play(&user, &track.id, Some(200.0))
        .await
        .unwrap());

    assert_eq!(play_count(test_db.pool(), &track.id).await, 0);
}

#[tokio::test]
async fn test_play_after_window_counts_again() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let policy = PlayCountPolicy::default();
    let recorder = PlayHistoryRecorder::new(&store, &policy);
    let user = UserId::new("listener");
    let track = create_test_track(test_db.pool(), "Loop", 200).await;
    let start = Utc::now() - Duration::hours(1);

    assert!(recorder
        .record_play_at(&user, &track.id, Some(60.0), start)
        .await
        .unwrap());
    assert!(!recorder
        .record_play_at(&user, &track.id, Some(60.0), start + Duration::seconds(299))
        .await
        .unwrap());
    assert!(recorder
        .record_play_at(&user, &track.id, Some(60.0), start + Duration::seconds(900))
        .await
        .unwrap());

    assert_eq!(play_count(test_db.pool(), &track.id).await, 2);
}

#[tokio::test]
async fn test_dedup_is_per_user() {
    let test_db = TestDb::new().await;
    let controller = test_db.controller();
    let track = create_test_track(test_db.pool(), "Hit", 200).await;

    for user in ["a", "b", "c"] {
        assert!(controller
            .record_play(&UserId::new(user), &track.id, Some(45.0))
            .await
            .unwrap());
    }

    assert_eq!(play_count(test_db.pool(), &track.id).await, 3);
    assert_eq!(controller.play_count(&track.id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_missing_duration_is_logged_but_not_counted() {
    let test_db = TestDb::new().await;
    let controller = test_db.controller();
    let user = UserId::new("listener");
    let track = create_test_track(test_db.pool(), "Unknown", 200).await;

    assert!(!controller.record_play(&user, &track.id, None).await.unwrap());

    let history = controller.recent_plays(&user, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].play_duration_seconds, None);
}

#[tokio::test]
async fn test_rejects_unknown_track_and_bad_duration() {
    let test_db = TestDb::new().await;
    let controller = test_db.controller();
    let user = UserId::new("listener");
    let track = create_test_track(test_db.pool(), "Tune", 200).await;

    let err = controller
        .record_play(&user, &TrackId::new("ghost"), Some(60.0))
        .await
        .unwrap_err();
    assert!(matches!(err, CadenceError::TrackNotFound(_)));

    let err = controller
        .record_play(&user, &track.id, Some(-1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, CadenceError::InvalidArgument(_)));

    // Rejected calls leave no history
    assert!(controller.recent_plays(&user, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_dedup_window_is_rejected_not_panicking() {
    let test_db = TestDb::new().await;
    let user = UserId::new("listener");
    let track = create_test_track(test_db.pool(), "Tune", 200).await;

    let mut config = PlaybackConfig::default();
    config.play_count.dedup_window_secs = i64::MAX;
    assert!(config.validate().is_err());

    // An unvalidated policy still fails cleanly at record time
    let controller = PlaybackController::new(test_db.store(), config);
    let err = controller
        .record_play(&user, &track.id, Some(60.0))
        .await
        .unwrap_err();
    assert!(matches!(err, CadenceError::InvalidArgument(_)));
    assert!(controller.recent_plays(&user, None).await.unwrap().is_empty());
}
