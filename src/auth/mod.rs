//! Authentication primitives: bcrypt password hashing, HMAC-signed access tokens and
//! a bearer-token extractor.
//!
//! None of the list or task routes require authentication; these building blocks
//! are provided for routes that choose to use them.

pub mod extractors;
pub mod password;
pub mod token;

pub use extractors::BearerClaims;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenSigner};
