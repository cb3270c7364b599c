//! # staff-services
//!
//! Business services for Staffing RS.
//!
//! Each service holds a shared [`StaffingStore`](staff_db::StaffingStore)
//! and returns [`StaffResult`](staff_core::StaffResult). The acting user is
//! always an explicit argument; nothing here reads ambient session state.

pub mod access;
pub mod aggregation;
pub mod base;
pub mod membership;
pub mod occupation;
pub mod projects;
pub mod resources;

#[cfg(test)]
pub(crate) mod fixtures;

pub use access::{
    AccessPlan, AccessService, ApprovalOutcome, ApprovalRequest, GrantRequest, RightsRequest,
};
pub use aggregation::{group_by_pole, AggregationService, EmployeeView, PoleGroup};
pub use base::SharedStore;
pub use membership::MembershipService;
pub use occupation::{OccupationEntry, OccupationService};
pub use projects::{ProjectDetails, ProjectService};
pub use resources::{ResourceDetails, ResourceService};
