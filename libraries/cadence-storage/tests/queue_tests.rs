//! Integration tests for the manual queue slice


use cadence_core::types::*;
use cadence_storage::queue;
use test_helpers::*;

#[tokio::test]
async fn test_append_assigns_increasing_positions() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let user = UserId::new("listener");
    let (album, tracks) = create_test_album(pool, "Album", 3, 180).await;
    let ctx = PlaybackContext::album(album.id.as_str());

    for track in &tracks {
        queue::append(pool, &user, &track.id, Some(&ctx)).await.unwrap();
    }

    let entries = queue::list(pool, &user, 50).await.unwrap();
    assert_eq!(positions(&entries, |e| e.item.position), vec![1, 2, 3]);
    assert_eq!(entries[0].track.title, "Album 1");
    assert_eq!(entries[0].track.album_title.as_deref(), Some("Album"));
    assert_eq!(entries[0].item.context, Some(ctx));
}

#[tokio::test]
async fn test_take_head_renumbers_remaining_items() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let user = UserId::new("listener");
    let (_, tracks) = create_test_album(pool, "Album", 3, 180).await;

    for track in &tracks {
        queue::append(pool, &user, &track.id, None).await.unwrap();
    }

    let head = queue::take_head(pool, &user).await.unwrap().unwrap();
    assert_eq!(head.track_id, tracks[0].id);
    assert_eq!(head.position, 1);

    let entries = queue::list(pool, &user, 50).await.unwrap();
    assert_eq!(positions(&entries, |e| e.item.position), vec![1, 2]);
    assert_eq!(entries[0].track.id, tracks[1].id);

    // Appending after a dequeue continues from the dense tail
    let item = queue::append(pool, &user, &tracks[0].id, None).await.unwrap();
    assert_eq!(item.position, 3);
}

#[tokio::test]
async fn test_take_head_on_empty_queue() {
    let test_db = TestDb::new().await;
    let user = UserId::new("listener");

    assert!(queue::take_head(test_db.pool(), &user).await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_middle_item_keeps_positions_dense() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let user = UserId::new("listener");
    let (_, tracks) = create_test_album(pool, "Album", 4, 180).await;

    let mut items = Vec::new();
    for track in &tracks {
        items.push(queue::append(pool, &user, &track.id, None).await.unwrap());
    }

    assert!(queue::remove(pool, &user, items[1].id).await.unwrap());
    assert!(!queue::remove(pool, &user, items[1].id).await.unwrap());

    let entries = queue::list(pool, &user, 50).await.unwrap();
    assert_eq!(positions(&entries, |e| e.item.position), vec![1, 2, 3]);
    let order: Vec<_> = entries.iter().map(|e| e.item.id).collect();
    assert_eq!(order, vec![items[0].id, items[2].id, items[3].id]);
}

#[tokio::test]
async fn test_queues_are_isolated_per_user() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let track = create_test_track(pool, "Shared", 200).await;

    let alice_item = queue::append(pool, &alice, &track.id, None).await.unwrap();
    let bob_item = queue::append(pool, &bob, &track.id, None).await.unwrap();
    assert_eq!(alice_item.position, 1);
    assert_eq!(bob_item.position, 1);

    // Bob cannot remove Alice's item
    assert!(!queue::remove(pool, &bob, alice_item.id).await.unwrap());
    assert_eq!(queue::len(pool, &alice).await.unwrap(), 1);

    assert_eq!(queue::clear(pool, &alice).await.unwrap(), 1);
    assert_eq!(queue::len(pool, &alice).await.unwrap(), 0);
    assert_eq!(queue::len(pool, &bob).await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_respects_limit() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let user = UserId::new("listener");
    let (_, tracks) = create_test_album(pool, "Album", 5, 180).await;

    for track in &tracks {
        queue::append(pool, &user, &track.id, None).await.unwrap();
    }

    let entries = queue::list(pool, &user, 2).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].item.position, 2);
}

#[tokio::test]
async fn test_concurrent_appends_stay_dense() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool().clone();
    let user = UserId::new("listener");
    let track = create_test_track(&pool, "Loop", 60).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let pool = pool.clone();
        let user = user.clone();
        let track_id = track.id.clone();
        handles.push(tokio::spawn(async move {
            queue::append(&pool, &user, &track_id, None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let entries = queue::list(&pool, &user, 50).await.unwrap();
    assert_eq!(positions(&entries, |e| e.item.position), (1..=10).collect::<Vec<_>>());
}
