use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use common::models::Account;

use super::Database;

#[derive(Debug, thiserror::Error)]
pub enum AccountQueryError {
    #[error("email is already registered")]
    EmailTaken,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for AccountQueryError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_error)
                if matches!(db_error.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                AccountQueryError::EmailTaken
            }
            _ => AccountQueryError::Database(e),
        }
    }
}

impl Database {
    /// Create a new account. The password hash is computed by the
    /// caller; plaintext never reaches this layer.
    pub async fn create_account(
        &self,
        display_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AccountQueryError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO accounts (id, display_name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(display_name)
        .bind(email)
        .bind(password_hash)
        .bind(created_at.timestamp_millis())
        .execute(&**self)
        .await?;

        Ok(Account {
            id,
            display_name: display_name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    pub async fn account_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, email, password_hash, created_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&**self)
        .await?;

        row.map(account_from_row).transpose()
    }

    pub async fn account_by_id(&self, id: &Uuid) -> Result<Option<Account>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, email, password_hash, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&**self)
        .await?;

        row.map(account_from_row).transpose()
    }
}

fn account_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Account, sqlx::Error> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let created_at: i64 = row.get("created_at");

    Ok(Account {
        id,
        display_name: row.get("display_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: DateTime::<Utc>::from_timestamp_millis(created_at).unwrap_or_default(),
    })
}
