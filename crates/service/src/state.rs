use rand::RngCore;

use common::crypto::TokenSigner;

use super::blobs::{BlobStore, BlobStoreConfig};
use super::config::Config;
use super::database::{Database, DatabaseSetupError};

/// Main service state - orchestrates all components.
///
/// Everything in here is cheap to clone and shared by value across
/// request handlers; the signing secret is read-only after startup.
#[derive(Clone)]
pub struct State {
    database: Database,
    blobs: BlobStore,
    tokens: TokenSigner,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let database = match config.sqlite_path {
            Some(ref path) => {
                tracing::info!(path = %path.display(), "opening sqlite database");
                Database::connect(path).await?
            }
            None => {
                tracing::info!("using in-memory sqlite database");
                Database::in_memory().await?
            }
        };

        // 2. Setup blob store
        let blobs_config = match config.uploads_path {
            Some(ref path) => BlobStoreConfig::Local { path: path.clone() },
            None => BlobStoreConfig::Memory,
        };
        let blobs = BlobStore::new(blobs_config)
            .await
            .map_err(|e| StateSetupError::BlobStoreError(e.to_string()))?;

        // 3. Setup token signer
        let tokens = match config.token_secret {
            Some(ref secret) => TokenSigner::new(secret.as_bytes()),
            None => {
                tracing::warn!(
                    "no token secret configured, generating one; sessions will not survive a restart"
                );
                let mut secret = [0u8; 32];
                rand::rngs::OsRng.fill_bytes(&mut secret);
                TokenSigner::new(secret)
            }
        };

        Ok(Self {
            database,
            blobs,
            tokens,
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn tokens(&self) -> &TokenSigner {
        &self.tokens
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        &self.database
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),

    #[error("blob store error: {0}")]
    BlobStoreError(String),
}
