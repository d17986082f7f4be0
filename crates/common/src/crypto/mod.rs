pub mod password;
pub mod token;

pub use password::PasswordError;
pub use token::{TokenError, TokenSigner};
