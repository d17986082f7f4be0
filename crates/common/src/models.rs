use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account. The password hash never leaves the server;
/// response types carry the other fields only.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An uploaded image and its metadata record.
///
/// Invariant: `password_hash == None` means the image is public,
/// `Some(_)` means it is protected. The owner reference is immutable
/// after creation.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub id: Uuid,
    /// Locator for the stored bytes in the blob store.
    pub filename: String,
    pub owner_id: Uuid,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}
