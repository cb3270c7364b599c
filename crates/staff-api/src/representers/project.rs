//! Project representers

use serde::Serialize;
use staff_core::traits::Id;
use staff_models::{Pole, Resource};
use staff_services::ProjectDetails;

use super::NamedRef;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberRepresentation {
    pub id: Option<Id>,
    pub full_name: String,
    pub position: Option<String>,
    pub skills: Vec<String>,
    pub occupation_rate: f64,
    pub pole: Option<NamedRef>,
}

impl ProjectMemberRepresentation {
    fn new(resource: &Resource, pole: Option<&Pole>) -> Self {
        Self {
            id: resource.id,
            full_name: resource.full_name.clone(),
            position: resource.position.clone(),
            skills: resource.skills.clone(),
            occupation_rate: resource.occupation_rate(),
            pole: pole.and_then(NamedRef::pole),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRepresentation {
    pub id: Option<Id>,
    pub code: String,
    pub name: String,
    pub required_skills: Vec<String>,
    pub resources: Vec<ProjectMemberRepresentation>,
}

impl From<&ProjectDetails> for ProjectRepresentation {
    fn from(details: &ProjectDetails) -> Self {
        let project = &details.project;
        Self {
            id: project.id,
            code: project.code.clone(),
            name: project.name.clone(),
            required_skills: project.required_skills.clone(),
            resources: details
                .resources
                .iter()
                .map(|(resource, pole)| ProjectMemberRepresentation::new(resource, pole.as_ref()))
                .collect(),
        }
    }
}
