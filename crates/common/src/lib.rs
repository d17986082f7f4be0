/**
 * Access decisions for image resources.
 *  One decision matrix over an explicit AccessPath,
 *  plus the operation-level authorization helpers.
 */
pub mod access;
/**
 * Credential primitives.
 *  - Salted one-way password hashing (accounts and
 *    per-image passwords share the same scheme)
 *  - Signed, time-limited session tokens
 */
pub mod crypto;
/**
 * The error taxonomy shared across the service:
 *  every authorization outcome maps onto one of
 *  these variants.
 */
pub mod error;
/**
 * Domain records: accounts and image records as they
 *  exist independently of any storage backend.
 */
pub mod models;

pub mod prelude {
    pub use crate::access::{AccessDecision, AccessPath, CallerContext};
    pub use crate::crypto::token::{TokenError, TokenSigner};
    pub use crate::error::AccessError;
    pub use crate::models::{Account, ImageRecord};
}
