//! Resource representers

use serde::Serialize;
use staff_core::traits::Id;
use staff_services::ResourceDetails;

use super::NamedRef;

/// Single resource with its pole, manager name and projects
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetailRepresentation {
    pub id: Option<Id>,
    pub full_name: String,
    pub position: Option<String>,
    pub occupation_rate: f64,
    pub availability_rate: f64,
    pub pole: Option<NamedRef>,
    pub skills: Vec<String>,
    pub project_manager: Option<String>,
    pub projects: Vec<NamedRef>,
}

impl From<&ResourceDetails> for ResourceDetailRepresentation {
    fn from(details: &ResourceDetails) -> Self {
        let resource = &details.resource;
        Self {
            id: resource.id,
            full_name: resource.full_name.clone(),
            position: resource.position.clone(),
            occupation_rate: resource.occupation_rate(),
            availability_rate: resource.availability_rate(),
            pole: details.pole.as_ref().and_then(NamedRef::pole),
            skills: resource.skills.clone(),
            project_manager: details.project_manager.as_ref().map(|u| u.display_name()),
            projects: details
                .projects
                .iter()
                .filter_map(|p| {
                    p.id.map(|id| NamedRef {
                        id,
                        name: p.name.clone(),
                    })
                })
                .collect(),
        }
    }
}

/// Row of the flat resource listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummaryRepresentation {
    pub id: Option<Id>,
    pub full_name: String,
    pub position: Option<String>,
    pub occupation_rate: f64,
    pub availability_rate: f64,
    pub avatar: Option<String>,
    pub pole: Option<NamedRef>,
    pub skills: Vec<String>,
    pub project_manager: Option<NamedRef>,
}

impl From<&ResourceDetails> for ResourceSummaryRepresentation {
    fn from(details: &ResourceDetails) -> Self {
        let resource = &details.resource;
        Self {
            id: resource.id,
            full_name: resource.full_name.clone(),
            position: resource.position.clone(),
            occupation_rate: resource.occupation_rate(),
            availability_rate: resource.availability_rate(),
            avatar: resource.avatar.clone(),
            pole: details.pole.as_ref().and_then(NamedRef::pole),
            skills: resource.skills.clone(),
            project_manager: details.project_manager.as_ref().and_then(|u| {
                u.id.map(|id| NamedRef {
                    id,
                    name: u.display_name(),
                })
            }),
        }
    }
}
