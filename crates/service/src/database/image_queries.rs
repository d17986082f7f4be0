use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use common::models::ImageRecord;

use super::Database;

/// Parameters for creating a new image record.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub filename: String,
    pub owner_id: Uuid,
    pub password_hash: Option<String>,
}

impl Database {
    /// Insert a new image record. The owner reference is fixed here and
    /// never updated afterwards.
    pub async fn create_image(&self, new: NewImage) -> Result<ImageRecord, sqlx::Error> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO images (id, filename, owner_id, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&new.filename)
        .bind(new.owner_id.to_string())
        .bind(&new.password_hash)
        .bind(created_at.timestamp_millis())
        .execute(&**self)
        .await?;

        Ok(ImageRecord {
            id,
            filename: new.filename,
            owner_id: new.owner_id,
            password_hash: new.password_hash,
            created_at,
        })
    }

    pub async fn image_by_id(&self, id: &Uuid) -> Result<Option<ImageRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, owner_id, password_hash, created_at
            FROM images
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&**self)
        .await?;

        row.map(image_from_row).transpose()
    }

    /// All images owned by an account, newest first.
    pub async fn images_for_owner(&self, owner_id: &Uuid) -> Result<Vec<ImageRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, owner_id, password_hash, created_at
            FROM images
            WHERE owner_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(owner_id.to_string())
        .fetch_all(&**self)
        .await?;

        rows.into_iter().map(image_from_row).collect()
    }

    /// Set or clear an image password hash. `None` clears protection.
    /// Single UPDATE per record: concurrent duplicate requests resolve
    /// last-writer-wins.
    pub async fn set_image_password(
        &self,
        id: &Uuid,
        password_hash: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE images SET password_hash = ? WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(id.to_string())
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_image(&self, id: &Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM images WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn image_from_row(row: sqlx::sqlite::SqliteRow) -> Result<ImageRecord, sqlx::Error> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let owner_id: String = row.get("owner_id");
    let owner_id = Uuid::parse_str(&owner_id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let created_at: i64 = row.get("created_at");

    Ok(ImageRecord {
        id,
        filename: row.get("filename"),
        owner_id,
        password_hash: row.get("password_hash"),
        created_at: DateTime::<Utc>::from_timestamp_millis(created_at).unwrap_or_default(),
    })
}
