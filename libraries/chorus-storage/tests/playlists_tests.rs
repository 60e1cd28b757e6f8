//! Integration tests for the playlists vertical slice
//!
//! Covers ownership-scoped lookups (hidden as not-found), the duplicate
//! membership rule, idempotent removal, and cascade on delete.


use chorus_core::{Caller, ChorusError};
use test_helpers::*;

#[tokio::test]
async fn create_and_list_scoped_to_owner() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let bob = create_test_user(pool, "bob", false).await;

    chorus_storage::playlists::create(pool, &Caller::user(alice, false), "Morning")
        .await
        .unwrap();
    chorus_storage::playlists::create(pool, &Caller::user(alice, false), "Evening")
        .await
        .unwrap();
    chorus_storage::playlists::create(pool, &Caller::user(bob, false), "Bob's")
        .await
        .unwrap();

    let playlists = chorus_storage::playlists::list_for(pool, &Caller::user(alice, false))
        .await
        .unwrap();

    assert_eq!(playlists.len(), 2);
    assert!(playlists.iter().all(|p| p.owner_id == alice));
}

#[tokio::test]
async fn create_rejects_empty_name() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;

    let err = chorus_storage::playlists::create(pool, &Caller::user(alice, false), "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::InvalidInput(_)));

    let err = chorus_storage::playlists::create(pool, &Caller::Anonymous, "Favorites")
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::Unauthenticated));
}

#[tokio::test]
async fn other_owners_playlist_reads_as_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let bob = create_test_user(pool, "bob", false).await;
    let playlist_id = create_test_playlist(pool, "Favorites", alice).await;

    let err =
        chorus_storage::playlists::get_with_songs(pool, &Caller::user(bob, false), playlist_id)
            .await
            .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));

    // Admins get no special path into other users' playlists either
    let err = chorus_storage::playlists::rename(
        pool,
        &Caller::user(99, true),
        playlist_id,
        "Hijacked",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));
}

#[tokio::test]
async fn rename_validates_and_updates() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let caller = Caller::user(alice, false);
    let playlist_id = create_test_playlist(pool, "Favorites", alice).await;

    let err = chorus_storage::playlists::rename(pool, &caller, playlist_id, "")
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::InvalidInput(_)));

    let playlist = chorus_storage::playlists::rename(pool, &caller, playlist_id, "Morning Run")
        .await
        .unwrap();
    assert_eq!(playlist.name, "Morning Run");

    let fetched = chorus_storage::playlists::get_with_songs(pool, &caller, playlist_id)
        .await
        .unwrap();
    assert_eq!(fetched.name, "Morning Run");
}

#[tokio::test]
async fn add_song_then_duplicate_is_distinct_error() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let caller = Caller::user(alice, false);
    let playlist_id = create_test_playlist(pool, "Favorites", alice).await;
    let song_id = create_test_song(pool, "Track1", alice, false, None).await;

    // First add succeeds and returns the song
    let song = chorus_storage::playlists::add_song(pool, &caller, playlist_id, song_id)
        .await
        .unwrap();
    assert_eq!(song.id, song_id);
    assert_eq!(membership_count(pool, playlist_id).await, 1);

    // Second add fails with the titled duplicate error, count unchanged
    let err = chorus_storage::playlists::add_song(pool, &caller, playlist_id, song_id)
        .await
        .unwrap_err();
    match err {
        ChorusError::DuplicateMembership {
            song_title,
            playlist_name,
        } => {
            assert_eq!(song_title, "Track1");
            assert_eq!(playlist_name, "Favorites");
        }
        other => panic!("expected DuplicateMembership, got {other:?}"),
    }
    assert_eq!(membership_count(pool, playlist_id).await, 1);
}

#[tokio::test]
async fn add_song_not_found_cases() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let bob = create_test_user(pool, "bob", false).await;
    let alice_playlist = create_test_playlist(pool, "Favorites", alice).await;
    let song_id = create_test_song(pool, "Track1", alice, true, None).await;

    // Someone else's playlist is hidden, not forbidden
    let err =
        chorus_storage::playlists::add_song(pool, &Caller::user(bob, false), alice_playlist, song_id)
            .await
            .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));

    // Missing song
    let err = chorus_storage::playlists::add_song(
        pool,
        &Caller::user(alice, false),
        alice_playlist,
        9999,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));

    // A private song the caller cannot read cannot be added either
    let bob_playlist = create_test_playlist(pool, "Bob's", bob).await;
    let private = create_test_song(pool, "Secret", alice, false, None).await;
    let err =
        chorus_storage::playlists::add_song(pool, &Caller::user(bob, false), bob_playlist, private)
            .await
            .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));
}

#[tokio::test]
async fn remove_song_is_idempotent() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let caller = Caller::user(alice, false);
    let playlist_id = create_test_playlist(pool, "Favorites", alice).await;
    let song_id = create_test_song(pool, "Track1", alice, true, None).await;

    chorus_storage::playlists::add_song(pool, &caller, playlist_id, song_id)
        .await
        .unwrap();

    chorus_storage::playlists::remove_song(pool, &caller, playlist_id, song_id)
        .await
        .unwrap();
    assert_eq!(membership_count(pool, playlist_id).await, 0);

    // Removing again: the desired end state already holds, so this succeeds
    chorus_storage::playlists::remove_song(pool, &caller, playlist_id, song_id)
        .await
        .unwrap();

    // A song that does not exist at all is still an error
    let err = chorus_storage::playlists::remove_song(pool, &caller, playlist_id, 9999)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));
}

#[tokio::test]
async fn get_with_songs_preserves_insertion_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let caller = Caller::user(alice, false);
    let playlist_id = create_test_playlist(pool, "Favorites", alice).await;

    let first = create_test_song(pool, "First", alice, true, None).await;
    let second = create_test_song(pool, "Second", alice, true, None).await;

    chorus_storage::playlists::add_song(pool, &caller, playlist_id, first)
        .await
        .unwrap();
    chorus_storage::playlists::add_song(pool, &caller, playlist_id, second)
        .await
        .unwrap();

    let playlist = chorus_storage::playlists::get_with_songs(pool, &caller, playlist_id)
        .await
        .unwrap();
    let songs = playlist.songs.unwrap();
    assert_eq!(songs.len(), 2);
    assert_eq!(songs[0].id, first);
    assert_eq!(songs[1].id, second);
}

#[tokio::test]
async fn delete_cascades_membership_rows() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let caller = Caller::user(alice, false);
    let playlist_id = create_test_playlist(pool, "Favorites", alice).await;
    let song_id = create_test_song(pool, "Track1", alice, true, None).await;

    chorus_storage::playlists::add_song(pool, &caller, playlist_id, song_id)
        .await
        .unwrap();

    chorus_storage::playlists::delete(pool, &caller, playlist_id)
        .await
        .unwrap();

    assert_eq!(membership_count(pool, playlist_id).await, 0);
    let err = chorus_storage::playlists::get_with_songs(pool, &caller, playlist_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));

    // The song itself is untouched
    chorus_storage::songs::get_visible(pool, &caller, song_id)
        .await
        .unwrap();
}
