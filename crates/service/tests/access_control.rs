//! Integration tests for the access-control core against real stores.

mod common;

use ::common::access::{self, AccessDecision, CallerContext};
use ::common::error::AccessError;
use service::database::AccountQueryError;

#[tokio::test]
async fn test_protected_upload_flow() {
    let state = common::setup_test_env().await;
    let alice = common::register_account(&state, "Alice", "alice@example.com", "pw-a").await;
    let bob = common::register_account(&state, "Bob", "bob@example.com", "pw-b").await;

    let record =
        common::upload_image(&state, &alice, "1-cat.png", b"png bytes", Some("secret123")).await;
    assert!(record.is_protected());

    // anonymous password verification
    assert!(!access::verify_resource_password(&record, Some("wrong"))
        .await
        .unwrap());
    assert!(access::verify_resource_password(&record, Some("secret123"))
        .await
        .unwrap());

    // authenticated non-owner cannot fetch a protected image
    let bob_ctx = CallerContext::Authenticated(bob.id);
    assert!(matches!(
        access::authorize_authenticated_fetch(&record, &bob_ctx),
        Err(AccessError::Forbidden)
    ));

    // the owner can
    let alice_ctx = CallerContext::Authenticated(alice.id);
    assert!(access::authorize_authenticated_fetch(&record, &alice_ctx).is_ok());
}

#[tokio::test]
async fn test_public_upload_flow() {
    let state = common::setup_test_env().await;
    let alice = common::register_account(&state, "Alice", "alice@example.com", "pw-a").await;

    let record = common::upload_image(&state, &alice, "2-dog.jpg", b"jpg bytes", None).await;
    assert!(!record.is_protected());

    // public fetch is allowed for any caller including anonymous
    assert_eq!(access::authorize_public_fetch(&record), AccessDecision::Allow);
    assert!(
        access::authorize_authenticated_fetch(&record, &CallerContext::Anonymous).is_err(),
        "anonymous callers use the public path, not the dashboard path"
    );
    assert_eq!(state.blobs().get("2-dog.jpg").await.unwrap(), "jpg bytes");
}

#[tokio::test]
async fn test_delete_as_non_owner_is_forbidden() {
    let state = common::setup_test_env().await;
    let alice = common::register_account(&state, "Alice", "alice@example.com", "pw-a").await;
    let bob = common::register_account(&state, "Bob", "bob@example.com", "pw-b").await;

    let record = common::upload_image(&state, &alice, "3-bird.png", b"bird", None).await;

    let bob_ctx = CallerContext::Authenticated(bob.id);
    assert!(matches!(
        access::authorize_owner_mutation(&record, &bob_ctx),
        Err(AccessError::Forbidden)
    ));

    // nothing was mutated: record and blob are still retrievable by the owner
    let fetched = state
        .database()
        .image_by_id(&record.id)
        .await
        .unwrap()
        .expect("record still present");
    assert_eq!(fetched.owner_id, alice.id);
    assert_eq!(state.blobs().get("3-bird.png").await.unwrap(), "bird");
}

#[tokio::test]
async fn test_password_set_and_clear_round_trip() {
    let state = common::setup_test_env().await;
    let alice = common::register_account(&state, "Alice", "alice@example.com", "pw-a").await;
    let record = common::upload_image(&state, &alice, "4-fish.png", b"fish", None).await;

    // set a password as the owner
    let alice_ctx = CallerContext::Authenticated(alice.id);
    access::authorize_owner_mutation(&record, &alice_ctx).unwrap();
    let hash = access::hash_optional_password(Some("hunter2")).await.unwrap();
    state
        .database()
        .set_image_password(&record.id, hash.as_deref())
        .await
        .unwrap();

    let protected = state
        .database()
        .image_by_id(&record.id)
        .await
        .unwrap()
        .unwrap();
    assert!(protected.is_protected());
    assert!(access::verify_resource_password(&protected, Some("hunter2"))
        .await
        .unwrap());
    assert!(!access::verify_resource_password(&protected, Some("hunter3"))
        .await
        .unwrap());

    // clear it again: any password (including the old one) now verifies
    state
        .database()
        .set_image_password(&record.id, None)
        .await
        .unwrap();
    let public = state
        .database()
        .image_by_id(&record.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!public.is_protected());
    assert!(access::verify_resource_password(&public, Some("hunter2"))
        .await
        .unwrap());
    assert!(access::verify_resource_password(&public, None).await.unwrap());
}

#[tokio::test]
async fn test_listing_is_owner_scoped_and_newest_first() {
    let state = common::setup_test_env().await;
    let alice = common::register_account(&state, "Alice", "alice@example.com", "pw-a").await;
    let bob = common::register_account(&state, "Bob", "bob@example.com", "pw-b").await;

    let first = common::upload_image(&state, &alice, "5-a.png", b"a", None).await;
    let second = common::upload_image(&state, &alice, "6-b.png", b"b", Some("pw")).await;
    common::upload_image(&state, &bob, "7-c.png", b"c", None).await;

    let listed = state.database().images_for_owner(&alice.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let state = common::setup_test_env().await;
    common::register_account(&state, "Alice", "alice@example.com", "pw-a").await;

    let result = state
        .database()
        .create_account("Impostor", "alice@example.com", "some-hash")
        .await;
    assert!(matches!(result, Err(AccountQueryError::EmailTaken)));
}

#[tokio::test]
async fn test_owner_is_immutable_and_exact() {
    let state = common::setup_test_env().await;
    let alice = common::register_account(&state, "Alice", "alice@example.com", "pw-a").await;
    let record = common::upload_image(&state, &alice, "8-d.png", b"d", Some("pw")).await;

    // every identity other than the exact owner is denied
    for _ in 0..3 {
        let other = CallerContext::Authenticated(uuid::Uuid::new_v4());
        assert!(access::authorize_owner_mutation(&record, &other).is_err());
    }
    assert!(access::authorize_owner_mutation(&record, &CallerContext::Anonymous).is_err());
}
