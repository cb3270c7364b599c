//! Resource CRUD
//!
//! Project sync on update replaces the whole set through the idempotent
//! helpers on [`Resource`]; unknown project ids are skipped with a warning.
//! An unknown pole id is an error.

use std::collections::{BTreeMap, BTreeSet};

use staff_contracts::resources::ResourceContract;
use staff_contracts::Contract;
use staff_core::error::StaffError;
use staff_core::result::StaffResult;
use staff_core::traits::Id;
use staff_db::{PoleStore, ProjectStore, ResourceStore, UserStore};
use staff_models::{NewResource, Pole, Project, Resource, ResourceChanges, User};

use crate::base::{require_pole, require_resource, SharedStore};

/// Resource with the related entities its views need
#[derive(Debug, Clone)]
pub struct ResourceDetails {
    pub resource: Resource,
    pub pole: Option<Pole>,
    pub project_manager: Option<User>,
    /// Ordered by project id
    pub projects: Vec<Project>,
}

/// Lookup tables loaded once per request
struct Related {
    poles: BTreeMap<Id, Pole>,
    users: BTreeMap<Id, User>,
    projects: BTreeMap<Id, Project>,
}

impl Related {
    async fn load(store: &SharedStore) -> StaffResult<Self> {
        Ok(Self {
            poles: store
                .list_poles()
                .await?
                .into_iter()
                .filter_map(|p| p.id.map(|id| (id, p)))
                .collect(),
            users: store
                .list_users()
                .await?
                .into_iter()
                .filter_map(|u| u.id.map(|id| (id, u)))
                .collect(),
            projects: store
                .list_projects()
                .await?
                .into_iter()
                .filter_map(|p| p.id.map(|id| (id, p)))
                .collect(),
        })
    }

    fn details(&self, resource: Resource) -> ResourceDetails {
        ResourceDetails {
            pole: resource.pole_id.and_then(|id| self.poles.get(&id)).cloned(),
            project_manager: resource
                .project_manager_id
                .and_then(|id| self.users.get(&id))
                .cloned(),
            projects: resource
                .project_ids
                .iter()
                .filter_map(|id| self.projects.get(id))
                .cloned()
                .collect(),
            resource,
        }
    }
}

#[derive(Clone)]
pub struct ResourceService {
    store: SharedStore,
    contract: ResourceContract,
}

impl ResourceService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            contract: ResourceContract::new(),
        }
    }

    pub async fn list_poles(&self) -> StaffResult<Vec<Pole>> {
        Ok(self.store.list_poles().await?)
    }

    pub async fn list_all(&self) -> StaffResult<Vec<ResourceDetails>> {
        let resources = self.store.list_resources().await?;
        let related = Related::load(&self.store).await?;
        Ok(resources.into_iter().map(|r| related.details(r)).collect())
    }

    /// Resources assigned to `project_id`; empty for an unknown project
    pub async fn list_in_project(&self, project_id: Id) -> StaffResult<Vec<ResourceDetails>> {
        let resources = self.store.resources_in_project(project_id).await?;
        let related = Related::load(&self.store).await?;
        Ok(resources.into_iter().map(|r| related.details(r)).collect())
    }

    pub async fn get(&self, id: Id) -> StaffResult<ResourceDetails> {
        let resource = require_resource(&*self.store, id).await?;
        self.details(resource).await
    }

    pub async fn create(&self, input: NewResource, acting_user: Id) -> StaffResult<ResourceDetails> {
        self.contract.validate(&input)?;

        let mut resource = Resource::new(input.full_name.trim());
        resource.position = input.position;
        resource.avatar = input.avatar;
        for skill in input.skills {
            resource.add_skill(skill);
        }
        resource.set_default_occupation_rate(input.occupation_rate.unwrap_or(0.0))?;
        if let Some(pole_id) = input.pole_id {
            require_pole(&*self.store, pole_id).await?;
            resource.pole_id = Some(pole_id);
        }
        self.sync_projects(&mut resource, &input.project_ids).await?;
        resource.project_manager_id = Some(acting_user);

        let created = self.store.create_resource(resource).await?;
        tracing::info!(resource_id = ?created.id, acting_user, "resource created");
        self.details(created).await
    }

    /// Partial update; scalar changes and project sync are saved together
    pub async fn update(
        &self,
        id: Id,
        changes: ResourceChanges,
        acting_user: Id,
    ) -> StaffResult<ResourceDetails> {
        self.contract.validate(&changes)?;

        let mut resource = require_resource(&*self.store, id).await?;
        resource.apply_changes(&changes)?;

        if let Some(pole_id) = changes.pole_id {
            require_pole(&*self.store, pole_id).await?;
            resource.pole_id = Some(pole_id);
        }

        if let Some(ref project_ids) = changes.project_ids {
            let current: Vec<Id> = resource.project_ids.iter().copied().collect();
            for project_id in current {
                resource.remove_project(project_id);
            }
            self.sync_projects(&mut resource, project_ids).await?;
            resource.project_manager_id = Some(acting_user);
        }

        self.store.save_resource(&resource).await?;
        tracing::info!(resource_id = id, acting_user, "resource updated");
        self.details(resource).await
    }

    pub async fn delete(&self, id: Id) -> StaffResult<()> {
        if !self.store.delete_resource(id).await? {
            return Err(StaffError::not_found("Resource", id));
        }
        tracing::info!(resource_id = id, "resource deleted");
        Ok(())
    }

    /// Add every known project in `project_ids`; unknown ids are logged and
    /// skipped
    async fn sync_projects(&self, resource: &mut Resource, project_ids: &[Id]) -> StaffResult<()> {
        if project_ids.is_empty() {
            return Ok(());
        }

        let known: BTreeSet<Id> = self
            .store
            .find_projects(project_ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id)
            .collect();

        for project_id in project_ids {
            if known.contains(project_id) {
                resource.add_project(*project_id);
            } else {
                tracing::warn!(
                    resource_id = ?resource.id,
                    project_id,
                    "unknown project in resource update, skipping"
                );
            }
        }
        Ok(())
    }

    async fn details(&self, resource: Resource) -> StaffResult<ResourceDetails> {
        let pole = match resource.pole_id {
            Some(id) => self.store.find_pole(id).await?,
            None => None,
        };
        let project_manager = match resource.project_manager_id {
            Some(id) => self.store.find_user(id).await?,
            None => None,
        };
        let ids: Vec<Id> = resource.project_ids.iter().copied().collect();
        let projects = self.store.find_projects(&ids).await?;

        Ok(ResourceDetails {
            resource,
            pole,
            project_manager,
            projects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn test_create_sets_manager_and_defaults() {
        let store = fixtures::store();
        let pm = fixtures::user(&store, "pm@example.com", "Pat", "M").await;
        let data = fixtures::pole(&store, "Data").await;
        let p1 = fixtures::project(&store, "P1", "One").await;
        let service = ResourceService::new(store);

        let details = service
            .create(
                NewResource {
                    full_name: "Ada".into(),
                    pole_id: Some(data),
                    project_ids: vec![p1, 77],
                    skills: vec!["rust".into(), "rust".into()],
                    ..Default::default()
                },
                pm,
            )
            .await
            .unwrap();

        assert_eq!(details.resource.occupation_rate(), 0.0);
        assert_eq!(details.resource.availability_rate(), 100.0);
        assert_eq!(details.resource.skills, vec!["rust".to_string()]);
        assert_eq!(details.pole.unwrap().name, "Data");
        assert_eq!(details.project_manager.unwrap().id, Some(pm));
        assert_eq!(details.projects.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let service = ResourceService::new(fixtures::store());

        let err = service.create(NewResource::default(), 1).await.unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = service
            .create(
                NewResource {
                    full_name: "Ada".into(),
                    pole_id: Some(5),
                    ..Default::default()
                },
                1,
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_create_with_unknown_manager_is_rejected() {
        let store = fixtures::store();
        let service = ResourceService::new(store.clone());

        let err = service
            .create(
                NewResource {
                    full_name: "Ada".into(),
                    ..Default::default()
                },
                404,
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert!(store.list_resources().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_projects_and_skips_unknown() {
        let store = fixtures::store();
        let p1 = fixtures::project(&store, "P1", "One").await;
        let p2 = fixtures::project(&store, "P2", "Two").await;
        let actor = fixtures::user(&store, "pm@example.com", "Pat", "M").await;
        let rid = fixtures::resource(&store, "Ada", None, 20.0).await;
        store.add_membership(rid, p1).await.unwrap();

        let service = ResourceService::new(store.clone());
        let details = service
            .update(
                rid,
                ResourceChanges {
                    project_ids: Some(vec![p2, 999]),
                    occupation_rate: Some(45.0),
                    ..Default::default()
                },
                actor,
            )
            .await
            .unwrap();

        assert_eq!(details.resource.project_ids.iter().copied().collect::<Vec<_>>(), vec![p2]);
        assert_eq!(details.resource.project_manager_id, Some(actor));
        assert_eq!(details.resource.availability_rate(), 55.0);

        let stored = store.find_resource(rid).await.unwrap().unwrap();
        assert!(stored.has_project(p2));
        assert!(!stored.has_project(p1));
    }

    #[tokio::test]
    async fn test_update_without_project_ids_keeps_manager() {
        let store = fixtures::store();
        let rid = fixtures::resource(&store, "Ada", None, 20.0).await;
        let service = ResourceService::new(store);

        let details = service
            .update(
                rid,
                ResourceChanges {
                    position: Some("Lead".into()),
                    ..Default::default()
                },
                3,
            )
            .await
            .unwrap();

        assert_eq!(details.resource.position.as_deref(), Some("Lead"));
        assert_eq!(details.resource.project_manager_id, None);
    }

    #[tokio::test]
    async fn test_update_unknown_pole_is_not_found() {
        let store = fixtures::store();
        let rid = fixtures::resource(&store, "Ada", None, 20.0).await;
        let service = ResourceService::new(store.clone());

        let err = service
            .update(
                rid,
                ResourceChanges {
                    pole_id: Some(8),
                    full_name: Some("Renamed".into()),
                    ..Default::default()
                },
                1,
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        let stored = store.find_resource(rid).await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Ada");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = fixtures::store();
        let rid = fixtures::resource(&store, "Ada", None, 20.0).await;
        let service = ResourceService::new(store);

        service.delete(rid).await.unwrap();
        assert_eq!(service.delete(rid).await.unwrap_err().status_code(), 404);
        assert_eq!(service.get(rid).await.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_list_all_resolves_relations() {
        let store = fixtures::store();
        let data = fixtures::pole(&store, "Data").await;
        fixtures::resource(&store, "Zed", Some(data), 0.0).await;
        fixtures::resource(&store, "Amy", None, 0.0).await;
        let service = ResourceService::new(store);

        let all = service.list_all().await.unwrap();
        assert_eq!(all[0].resource.full_name, "Amy");
        assert!(all[0].pole.is_none());
        assert_eq!(all[1].pole.as_ref().unwrap().name, "Data");
    }
}
