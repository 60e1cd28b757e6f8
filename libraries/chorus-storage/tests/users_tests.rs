//! Integration tests for the users vertical slice
//!
//! Covers registration constraints, the self-protection rules on role
//! changes and deletion, and the cascading account delete.


use chorus_core::{Caller, ChorusError};
use test_helpers::*;

#[tokio::test]
async fn create_user_and_look_up() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = chorus_storage::users::create(pool, "alice", "hash-a", false)
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert!(!user.is_admin);

    let by_name = chorus_storage::users::get_by_username(pool, "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, user.id);

    let hash = chorus_storage::users::get_password_hash(pool, user.id)
        .await
        .unwrap();
    assert_eq!(hash.as_deref(), Some("hash-a"));

    assert!(chorus_storage::users::get_by_id(pool, 9999)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_username_is_invalid_input() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    chorus_storage::users::create(pool, "alice", "hash-a", false)
        .await
        .unwrap();

    let err = chorus_storage::users::create(pool, "alice", "hash-b", false)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::InvalidInput(_)));

    let err = chorus_storage::users::create(pool, "  ", "hash-c", false)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::InvalidInput(_)));
}

#[tokio::test]
async fn get_all_lists_newest_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let bob = create_test_user(pool, "bob", true).await;

    let users = chorus_storage::users::get_all(pool).await.unwrap();
    assert_eq!(users.len(), 2);
    // Same created_at second in tests, so the id tiebreaker decides
    assert_eq!(users[0].id, bob);
    assert_eq!(users[1].id, alice);
    assert!(users[0].is_admin);
}

#[tokio::test]
async fn set_role_requires_admin_and_another_target() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let admin = create_test_user(pool, "root", true).await;

    // Non-admin caller
    let err = chorus_storage::users::set_role(pool, &Caller::user(alice, false), admin, false)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::Forbidden(_)));

    // Admin demoting themselves is refused before the admin check matters
    let err = chorus_storage::users::set_role(pool, &Caller::user(admin, true), admin, false)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::SelfRoleChange));

    // Unknown target
    let err = chorus_storage::users::set_role(pool, &Caller::user(admin, true), 9999, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));

    // Promotion works and the returned user reflects the new role
    let user = chorus_storage::users::set_role(pool, &Caller::user(admin, true), alice, true)
        .await
        .unwrap();
    assert!(user.is_admin);
}

#[tokio::test]
async fn self_protection_applies_even_to_non_admin_self() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;

    // Targeting yourself is its own refusal, not a plain Forbidden
    let err = chorus_storage::users::set_role(pool, &Caller::user(alice, false), alice, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::SelfRoleChange));

    let err = chorus_storage::users::delete(pool, &Caller::user(alice, false), alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::SelfDeletion));
}

#[tokio::test]
async fn delete_guards_and_cascade() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice", false).await;
    let bob = create_test_user(pool, "bob", false).await;
    let admin = create_test_user(pool, "root", true).await;

    // Alice's content, plus a membership in Bob's playlist pointing at
    // Alice's song
    let alice_song = create_test_song(pool, "Track1", alice, true, None).await;
    let alice_playlist = create_test_playlist(pool, "Favorites", alice).await;
    let bob_playlist = create_test_playlist(pool, "Bob's", bob).await;
    let bob_song = create_test_song(pool, "BobTrack", bob, true, None).await;

    chorus_storage::playlists::add_song(pool, &Caller::user(alice, false), alice_playlist, alice_song)
        .await
        .unwrap();
    chorus_storage::playlists::add_song(pool, &Caller::user(bob, false), bob_playlist, alice_song)
        .await
        .unwrap();
    chorus_storage::playlists::add_song(pool, &Caller::user(bob, false), bob_playlist, bob_song)
        .await
        .unwrap();

    // Guard checks first
    let err = chorus_storage::users::delete(pool, &Caller::Anonymous, alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::Unauthenticated));

    let err = chorus_storage::users::delete(pool, &Caller::user(bob, false), alice)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::Forbidden(_)));

    let err = chorus_storage::users::delete(pool, &Caller::user(admin, true), admin)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::SelfDeletion));

    let err = chorus_storage::users::delete(pool, &Caller::user(admin, true), 9999)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));

    // The cascade itself
    chorus_storage::users::delete(pool, &Caller::user(admin, true), alice)
        .await
        .unwrap();

    assert!(chorus_storage::users::get_by_id(pool, alice)
        .await
        .unwrap()
        .is_none());
    assert!(chorus_storage::users::get_password_hash(pool, alice)
        .await
        .unwrap()
        .is_none());

    let err = chorus_storage::songs::get_visible(pool, &Caller::user(admin, true), alice_song)
        .await
        .unwrap_err();
    assert!(matches!(err, ChorusError::NotFound { .. }));

    // Alice's playlist is gone, and her song's membership in Bob's playlist
    // went with it; Bob's own content survives
    assert_eq!(membership_count(pool, alice_playlist).await, 0);
    assert_eq!(membership_count(pool, bob_playlist).await, 1);
    chorus_storage::songs::get_visible(pool, &Caller::user(bob, false), bob_song)
        .await
        .unwrap();
}
