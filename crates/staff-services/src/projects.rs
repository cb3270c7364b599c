//! Project views
//!
//! A project's resource list is derived from the resources through
//! [`ProjectMembershipIndex`]; projects never store their members.

use std::collections::BTreeMap;

use staff_core::result::StaffResult;
use staff_core::traits::Id;
use staff_db::{PoleStore, ProjectStore, ResourceStore};
use staff_models::{Pole, Project, ProjectMembershipIndex, Resource};

use crate::base::{require_project, SharedStore};

/// Project with its assigned resources and their poles
#[derive(Debug, Clone)]
pub struct ProjectDetails {
    pub project: Project,
    pub resources: Vec<(Resource, Option<Pole>)>,
}

#[derive(Clone)]
pub struct ProjectService {
    store: SharedStore,
}

impl ProjectService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> StaffResult<Vec<ProjectDetails>> {
        let projects = self.store.list_projects().await?;
        self.assemble(projects).await
    }

    pub async fn get(&self, id: Id) -> StaffResult<ProjectDetails> {
        let project = require_project(&*self.store, id).await?;
        let mut details = self.assemble(vec![project]).await?;
        Ok(details.remove(0))
    }

    async fn assemble(&self, projects: Vec<Project>) -> StaffResult<Vec<ProjectDetails>> {
        let resources = self.store.list_resources().await?;
        let poles: BTreeMap<Id, Pole> = self
            .store
            .list_poles()
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        let index = ProjectMembershipIndex::build(&resources);
        let by_id: BTreeMap<Id, &Resource> = resources
            .iter()
            .filter_map(|r| r.id.map(|id| (id, r)))
            .collect();

        Ok(projects
            .into_iter()
            .map(|project| {
                let members = project
                    .id
                    .map(|pid| index.resources_of(pid))
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|rid| by_id.get(&rid).copied())
                    .map(|r| {
                        let pole = r.pole_id.and_then(|id| poles.get(&id)).cloned();
                        (r.clone(), pole)
                    })
                    .collect();
                ProjectDetails {
                    project,
                    resources: members,
                }
            })
            .collect())
    }
}
