//! Authentication infrastructure module
//!
//! Credential verification and JWT token management.

mod authenticator;
mod jwt;

pub use authenticator::Authenticator;
pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
