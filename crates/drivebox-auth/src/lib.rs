//! # drivebox-auth
//!
//! Credential issuance consumed by the HTTP boundary: Argon2id password
//! hashing, JWT access tokens, and the in-memory user directory. The core
//! engine never sees credentials; it trusts the owner id the boundary
//! extracts from a verified token.

pub mod directory;
pub mod jwt;
pub mod password;

pub use directory::UserDirectory;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
