//! The resource access controller.
//!
//! All authorization rules for image records live here, in one place:
//! a single decision matrix over an explicit [`AccessPath`], plus the
//! operation-level helpers the HTTP layer calls into. Handlers never
//! inspect `password_hash` or `owner_id` themselves.
//!
//! Every decision is made once, upfront, before any byte of content
//! moves; nothing here holds state across a request.

use uuid::Uuid;

use crate::crypto::password::{self, PasswordError};
use crate::error::AccessError;
use crate::models::ImageRecord;

/// The resolved identity of an incoming request, derived from session
/// token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerContext {
    Authenticated(Uuid),
    Anonymous,
}

impl CallerContext {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, CallerContext::Authenticated(_))
    }

    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            CallerContext::Authenticated(id) => Some(*id),
            CallerContext::Anonymous => None,
        }
    }
}

/// Which authorization rule a request travels through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPath {
    /// Mutations and owner listings: only the exact owner.
    OwnerOnly,
    /// Credential-free serving: public images only, for any caller.
    PublicOnly,
    /// Anonymous viewing: public images pass outright; protected ones
    /// defer to [`verify_resource_password`]. The matrix itself never
    /// sees a password.
    PasswordGated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

/// The authorization matrix. Keep every rule here so the whole policy
/// is auditable at a glance.
pub fn decide(path: AccessPath, record: &ImageRecord, caller: &CallerContext) -> AccessDecision {
    match path {
        AccessPath::OwnerOnly => match caller {
            CallerContext::Authenticated(id) if *id == record.owner_id => AccessDecision::Allow,
            _ => AccessDecision::Deny,
        },
        // identical matrix rows, distinct paths: a PublicOnly deny is
        // terminal, a PasswordGated deny hands off to the password check
        AccessPath::PublicOnly | AccessPath::PasswordGated => {
            if record.is_protected() {
                AccessDecision::Deny
            } else {
                AccessDecision::Allow
            }
        }
    }
}

/// Authorize an upload and prepare the stored password hash.
///
/// Requires an authenticated caller. An absent or empty password means
/// the image is public (`None`); otherwise the plaintext is hashed on a
/// blocking worker. Returns the hash to store alongside the new record.
pub async fn authorize_upload(
    caller: &CallerContext,
    supplied_password: Option<&str>,
) -> Result<Option<String>, AccessError> {
    if !caller.is_authenticated() {
        return Err(AccessError::Unauthenticated);
    }
    hash_optional_password(supplied_password).await
}

/// Authorize a mutation (password change, delete) or owner-scoped read.
///
/// Existence is checked by the caller before this point; here only the
/// exact owner passes. Other authenticated accounts get `Forbidden`
/// like everyone else.
pub fn authorize_owner_mutation(
    record: &ImageRecord,
    caller: &CallerContext,
) -> Result<(), AccessError> {
    match decide(AccessPath::OwnerOnly, record, caller) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny => Err(AccessError::Forbidden),
    }
}

/// Authorize the identity-only dashboard fetch: owner or public image.
/// This path never accepts a password.
pub fn authorize_authenticated_fetch(
    record: &ImageRecord,
    caller: &CallerContext,
) -> Result<(), AccessError> {
    if decide(AccessPath::OwnerOnly, record, caller) == AccessDecision::Allow
        || decide(AccessPath::PublicOnly, record, caller) == AccessDecision::Allow
    {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

/// Authorize the credential-free public fetch. Protected images are
/// denied unconditionally, regardless of caller identity.
pub fn authorize_public_fetch(record: &ImageRecord) -> AccessDecision {
    decide(AccessPath::PublicOnly, record, &CallerContext::Anonymous)
}

/// Verify a supplied password against an image record.
///
/// Public images verify unconditionally, whatever was supplied. For
/// protected images a non-empty password is required and compared via
/// the one-way hash; a mismatch is `Ok(false)`, never an error.
pub async fn verify_resource_password(
    record: &ImageRecord,
    supplied_password: Option<&str>,
) -> Result<bool, AccessError> {
    let stored = match &record.password_hash {
        None => return Ok(true),
        Some(hash) => hash.clone(),
    };
    let supplied = match supplied_password {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => return Ok(false),
    };
    password::verify(supplied, stored)
        .await
        .map_err(internal_hash_error)
}

/// Hash an optional password for storage: absent/empty clears
/// protection, anything else becomes a salted hash.
pub async fn hash_optional_password(
    supplied_password: Option<&str>,
) -> Result<Option<String>, AccessError> {
    match supplied_password {
        Some(p) if !p.is_empty() => {
            let hash = password::hash(p.to_string())
                .await
                .map_err(internal_hash_error)?;
            Ok(Some(hash))
        }
        _ => Ok(None),
    }
}

fn internal_hash_error(e: PasswordError) -> AccessError {
    // log the detail, report a generic failure: the response must not
    // reveal whether a password was previously set
    tracing::error!("password hash computation failed: {}", e);
    AccessError::Internal("password verification unavailable".to_string())
}
