//! # staff-models
//!
//! Domain models for Staffing RS.
//!
//! Entities here are plain data plus the rules that keep them consistent
//! (the occupation-rate engine lives on [`Resource`]). Persistence is the job
//! of `staff-db`; nothing in this crate performs I/O.

pub use staff_core::traits::{Entity, Id, Identifiable};

pub mod membership;
pub mod pole;
pub mod project;
pub mod resource;
pub mod user;

pub use membership::ProjectMembershipIndex;
pub use pole::Pole;
pub use project::Project;
pub use resource::model::{NewResource, Resource, ResourceChanges};
pub use resource::occupation::{
    check_rate, effective_rate, truncate_rate, OccupationRecord, MAX_RATE, MIN_RATE, RATE_RANGE_MESSAGE,
};
pub use user::{ProjectAccess, User};
