//! Credential and session-token service.
//!
//! Passwords are hashed with bcrypt at a fixed cost of 12 so verification
//! stays intentionally slow. Session tokens are HS256 JWTs carrying
//! `{sub, email, name, iat, exp}` with a fixed 7-day expiry; the signing
//! secret is provided at startup (never defaulted) and validation fails
//! closed on any parse, signature, or expiry error.

pub mod cookie;
pub mod password;
pub mod principal;
pub mod token;

mod state;

pub use self::state::{AuthConfig, AuthState};
