//! Signed, time-limited session tokens.
//!
//! A token is `base64url(claims json) . base64url(hmac-sha256 tag)`,
//! stateless and never persisted server-side. The signing secret is
//! handed to the signer at construction (loaded once at startup) and
//! never read from ambient state.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Session lifetime: one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no token supplied")]
    Missing,

    #[error("token could not be parsed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens for a fixed signing secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    // never expose the secret, even in debug logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish()
    }
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Mint a token for an account, expiring [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, account_id: Uuid) -> String {
        self.issue_at(account_id, Utc::now())
    }

    /// Verify a token and return the embedded account id.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn issue_at(&self, account_id: Uuid, now: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: account_id,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_TTL_SECS,
        };
        // serializing a plain struct of scalars cannot fail
        let payload = serde_json::to_vec(&claims).expect("claims serialize");
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload);
        let tag = self.sign(payload_b64.as_bytes());
        format!("{}.{}", payload_b64, URL_SAFE_NO_PAD.encode(tag))
    }

    /// Clock-injected verification. Pure: no I/O, deterministic for a
    /// given secret and instant.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        let (payload_b64, tag_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key size");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&tag)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims.sub)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key size");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}
