//! # staff-auth
//!
//! Authentication for Staffing RS.
//!
//! Identity is consumed, not produced: callers present a bearer JWT signed
//! with the shared secret and the API resolves it into a [`CurrentUser`].

pub mod jwt;
pub mod permissions;

pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use permissions::CurrentUser;
