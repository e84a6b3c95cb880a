//! Integration tests for catalog reads


use cadence_core::{types::*, CadenceError, CatalogReader};
use cadence_storage::{albums, tracks};
use test_helpers::*;

#[tokio::test]
async fn test_track_carries_display_fields() {
    let test_db = TestDb::new().await;
    let (album, created) = create_test_album(test_db.pool(), "Blue", 1, 245).await;

    let track = tracks::get_by_id(test_db.pool(), &created[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(track.title, "Blue 1");
    assert_eq!(track.artist_name.as_deref(), Some("Test Artist"));
    assert_eq!(track.album_id.as_ref(), Some(&album.id));
    assert_eq!(track.album_title.as_deref(), Some("Blue"));
    assert_eq!(track.duration_ms(), 245_000);
    assert_eq!(track.play_count, 0);
}

#[tokio::test]
async fn test_album_tracks_follow_track_number() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let album = albums::create(
        pool,
        CreateAlbum {
            title: "Shuffled Insert".to_string(),
            artist_id: None,
        },
    )
    .await
    .unwrap();

    let mut ids = Vec::new();
    for n in [3, 1, 2] {
        let track = tracks::create(
            pool,
            CreateTrack {
                title: format!("Track {n}"),
                artist_id: None,
                album_id: Some(album.id.clone()),
                track_number: Some(n),
                duration_seconds: 100,
            },
        )
        .await
        .unwrap();
        ids.push((n, track.id));
    }
    ids.sort_by_key(|(n, _)| *n);
    let expected: Vec<TrackId> = ids.into_iter().map(|(_, id)| id).collect();

    let ordered = albums::ordered_track_ids(pool, &album.id).await.unwrap();
    assert_eq!(ordered, expected);
}

#[tokio::test]
async fn test_increment_play_count() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let track = create_test_track(pool, "Counted", 100).await;

    tracks::increment_play_count(pool, &track.id).await.unwrap();
    tracks::increment_play_count(pool, &track.id).await.unwrap();

    let count = tracks::get_play_count(pool, &track.id).await.unwrap();
    assert_eq!(count, 2);

    let err = tracks::increment_play_count(pool, &TrackId::new("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, CadenceError::TrackNotFound(_)));
}

#[tokio::test]
async fn test_negative_duration_is_rejected() {
    let test_db = TestDb::new().await;

    let err = tracks::create(
        test_db.pool(),
        CreateTrack {
            title: "Broken".to_string(),
            artist_id: None,
            album_id: None,
            track_number: None,
            duration_seconds: -1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CadenceError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_context_names() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let owner = UserId::new("owner");
    let (album, _) = create_test_album(test_db.pool(), "Named Album", 1, 100).await;
    let playlist = create_test_playlist(test_db.pool(), "Named Playlist", &owner, &[]).await;

    let name = store
        .get_context_name(&PlaybackContext::album(album.id.as_str()))
        .await
        .unwrap();
    assert_eq!(name.as_deref(), Some("Named Album"));

    let name = store
        .get_context_name(&PlaybackContext::playlist(playlist.id.as_str()))
        .await
        .unwrap();
    assert_eq!(name.as_deref(), Some("Named Playlist"));

    let name = store
        .get_context_name(&PlaybackContext::new(ContextType::Search, "q"))
        .await
        .unwrap();
    assert_eq!(name, None);
}
