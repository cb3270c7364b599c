//! # staff-api
//!
//! REST handlers for Staffing RS.
//!
//! Every `/api` route requires a bearer token; the admin routes additionally
//! require the `admin` claim.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod representers;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ApiError, ApiResult};
pub use extractors::AppState;
pub use routes::router;
