//! Shared test utilities for service integration tests
#![allow(dead_code)]

use bytes::Bytes;

use ::common::access::{self, CallerContext};
use ::common::crypto::password::hash_sync;
use ::common::models::{Account, ImageRecord};
use service::database::NewImage;
use service::{Config, ServiceState};

/// Set up a test environment: in-memory database, in-memory blob
/// store, fixed signing secret.
pub async fn setup_test_env() -> ServiceState {
    let config = Config {
        token_secret: Some("test-signing-secret".to_string()),
        ..Config::default()
    };
    ServiceState::from_config(&config)
        .await
        .expect("test state setup")
}

/// Register an account directly against the store.
pub async fn register_account(
    state: &ServiceState,
    display_name: &str,
    email: &str,
    password: &str,
) -> Account {
    let password_hash = hash_sync(password).unwrap();
    state
        .database()
        .create_account(display_name, email, &password_hash)
        .await
        .unwrap()
}

/// Upload an image through the access controller: authorize, store
/// bytes, create the record.
pub async fn upload_image(
    state: &ServiceState,
    owner: &Account,
    locator: &str,
    content: &[u8],
    password: Option<&str>,
) -> ImageRecord {
    let caller = CallerContext::Authenticated(owner.id);
    let password_hash = access::authorize_upload(&caller, password).await.unwrap();

    state
        .blobs()
        .put(locator, Bytes::copy_from_slice(content))
        .await
        .unwrap();

    state
        .database()
        .create_image(NewImage {
            filename: locator.to_string(),
            owner_id: owner.id,
            password_hash,
        })
        .await
        .unwrap()
}
