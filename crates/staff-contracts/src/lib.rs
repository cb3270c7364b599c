//! # staff-contracts
//!
//! Input contracts for Staffing RS.
//!
//! Contracts check request input before any service touches storage:
//! date parameters, occupation rates and resource attributes. They only
//! produce [`ValidationErrors`](staff_core::error::ValidationErrors);
//! existence checks (unknown pole, unknown project) belong to the services.

pub mod base;
pub mod dates;
pub mod occupation;
pub mod resources;

pub use base::*;
