//! Response representers
//!
//! Convert service results into the camelCase JSON shapes the frontend
//! consumes.

pub mod occupation;
pub mod project;
pub mod resource;
pub mod user;

use serde::Serialize;
use staff_core::traits::Id;
use staff_models::Pole;

pub use occupation::{OccupationEntryRepresentation, TodayOccupationRepresentation};
pub use project::ProjectRepresentation;
pub use resource::{ResourceDetailRepresentation, ResourceSummaryRepresentation};
pub use user::{AdminUserRepresentation, ApprovalRepresentation};

/// `{id, name}` reference to a related entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRef {
    pub id: Id,
    pub name: String,
}

impl NamedRef {
    pub fn pole(pole: &Pole) -> Option<Self> {
        pole.id.map(|id| NamedRef {
            id,
            name: pole.name.clone(),
        })
    }
}

/// Plain `{message}` acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageRepresentation {
    pub message: &'static str,
}
