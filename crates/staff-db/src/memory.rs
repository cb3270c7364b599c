//! In-memory store
//!
//! Backs the service and HTTP tests, and the server when no database is
//! configured. Every operation takes the lock once, so check-and-write
//! sequences (the occupation upsert, membership add/remove) are atomic.
//! Referential checks mirror the foreign keys of the SQL schema.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use staff_core::traits::Id;
use staff_models::{OccupationRecord, Pole, Project, ProjectAccess, Resource, User};

use crate::repository::{RepositoryError, RepositoryResult};
use crate::store::{
    OccupationListing, OccupationStore, PoleStore, ProjectStore, ResourceSnapshot, ResourceStore,
    StaffingStore, UserStore,
};

#[derive(Debug, Default)]
struct Sequences {
    pole: Id,
    project: Id,
    resource: Id,
    record: Id,
    user: Id,
}

fn bump(seq: &mut Id) -> Id {
    *seq += 1;
    *seq
}

#[derive(Debug, Default)]
struct MemoryState {
    poles: BTreeMap<Id, Pole>,
    projects: BTreeMap<Id, Project>,
    resources: BTreeMap<Id, Resource>,
    records: BTreeMap<(Id, NaiveDate), OccupationRecord>,
    users: BTreeMap<Id, User>,
    seq: Sequences,
}

impl MemoryState {
    fn check_resource_refs(&self, resource: &Resource) -> RepositoryResult<()> {
        if let Some(pole_id) = resource.pole_id {
            if !self.poles.contains_key(&pole_id) {
                return Err(RepositoryError::InvalidReference(format!(
                    "pole {pole_id} does not exist"
                )));
            }
        }
        if let Some(user_id) = resource.project_manager_id {
            self.check_user(user_id)?;
        }
        if let Some(project_id) = resource
            .project_ids
            .iter()
            .find(|id| !self.projects.contains_key(id))
        {
            return Err(RepositoryError::InvalidReference(format!(
                "project {project_id} does not exist"
            )));
        }
        Ok(())
    }

    fn check_user(&self, user_id: Id) -> RepositoryResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidReference(format!(
                "user {user_id} does not exist"
            )))
        }
    }

    fn check_grants(&self, grants: &[ProjectAccess]) -> RepositoryResult<()> {
        match grants
            .iter()
            .find(|a| !self.projects.contains_key(&a.project_id))
        {
            Some(a) => Err(RepositoryError::InvalidReference(format!(
                "project {} does not exist",
                a.project_id
            ))),
            None => Ok(()),
        }
    }

    fn snapshot(&self, resource: &Resource, date: NaiveDate) -> Option<ResourceSnapshot> {
        let id = resource.id?;
        let mut project_names: Vec<String> = resource
            .project_ids
            .iter()
            .filter_map(|pid| self.projects.get(pid))
            .map(|p| p.name.clone())
            .collect();
        project_names.sort();

        Some(ResourceSnapshot {
            id,
            full_name: resource.full_name.clone(),
            position: resource.position.clone(),
            avatar: resource.avatar.clone(),
            occupation_rate: resource.occupation_rate(),
            availability_rate: resource.availability_rate(),
            skills: resource.skills.clone(),
            pole_name: resource
                .pole_id
                .and_then(|pid| self.poles.get(&pid))
                .map(|p| p.name.clone()),
            project_manager_name: resource
                .project_manager_id
                .and_then(|uid| self.users.get(&uid))
                .map(User::display_name)
                .filter(|name| !name.is_empty()),
            dated_rate: self.records.get(&(id, date)).map(|r| r.occupation_rate),
            project_names,
        })
    }
}

/// Store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PoleStore for MemoryStore {
    async fn list_poles(&self) -> RepositoryResult<Vec<Pole>> {
        let state = self.state.read();
        let mut poles: Vec<Pole> = state.poles.values().cloned().collect();
        poles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(poles)
    }

    async fn find_pole(&self, id: Id) -> RepositoryResult<Option<Pole>> {
        Ok(self.state.read().poles.get(&id).cloned())
    }

    async fn create_pole(&self, mut pole: Pole) -> RepositoryResult<Pole> {
        let mut state = self.state.write();
        let id = bump(&mut state.seq.pole);
        pole.id = Some(id);
        state.poles.insert(id, pole.clone());
        Ok(pole)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        Ok(self.state.read().projects.values().cloned().collect())
    }

    async fn find_project(&self, id: Id) -> RepositoryResult<Option<Project>> {
        Ok(self.state.read().projects.get(&id).cloned())
    }

    async fn find_projects(&self, ids: &[Id]) -> RepositoryResult<Vec<Project>> {
        let state = self.state.read();
        Ok(state
            .projects
            .values()
            .filter(|p| p.id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn create_project(&self, mut project: Project) -> RepositoryResult<Project> {
        let mut state = self.state.write();
        let id = bump(&mut state.seq.project);
        project.id = Some(id);
        state.projects.insert(id, project.clone());
        Ok(project)
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_resources(&self) -> RepositoryResult<Vec<Resource>> {
        let state = self.state.read();
        let mut resources: Vec<Resource> = state.resources.values().cloned().collect();
        resources.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(resources)
    }

    async fn find_resource(&self, id: Id) -> RepositoryResult<Option<Resource>> {
        Ok(self.state.read().resources.get(&id).cloned())
    }

    async fn resources_in_project(&self, project_id: Id) -> RepositoryResult<Vec<Resource>> {
        let state = self.state.read();
        let mut resources: Vec<Resource> = state
            .resources
            .values()
            .filter(|r| r.has_project(project_id))
            .cloned()
            .collect();
        resources.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(resources)
    }

    async fn create_resource(&self, resource: Resource) -> RepositoryResult<Resource> {
        let mut state = self.state.write();
        state.check_resource_refs(&resource)?;
        let id = bump(&mut state.seq.resource);
        let mut resource = resource.with_occupation_records(Vec::new());
        resource.id = Some(id);
        state.resources.insert(id, resource.clone());
        Ok(resource)
    }

    async fn save_resource(&self, resource: &Resource) -> RepositoryResult<()> {
        let id = resource
            .id
            .ok_or_else(|| RepositoryError::not_found("Resource", 0))?;
        let mut state = self.state.write();
        if !state.resources.contains_key(&id) {
            return Err(RepositoryError::not_found("Resource", id));
        }
        state.check_resource_refs(resource)?;
        state
            .resources
            .insert(id, resource.clone().with_occupation_records(Vec::new()));
        Ok(())
    }

    async fn delete_resource(&self, id: Id) -> RepositoryResult<bool> {
        let mut state = self.state.write();
        if state.resources.remove(&id).is_none() {
            return Ok(false);
        }
        state.records.retain(|(resource_id, _), _| *resource_id != id);
        Ok(true)
    }

    async fn add_membership(&self, resource_id: Id, project_id: Id) -> RepositoryResult<bool> {
        let mut state = self.state.write();
        if !state.projects.contains_key(&project_id) {
            return Err(RepositoryError::not_found("Project", project_id));
        }
        let resource = state
            .resources
            .get_mut(&resource_id)
            .ok_or_else(|| RepositoryError::not_found("Resource", resource_id))?;
        Ok(resource.add_project(project_id))
    }

    async fn remove_membership(&self, resource_id: Id, project_id: Id) -> RepositoryResult<bool> {
        let mut state = self.state.write();
        let resource = state
            .resources
            .get_mut(&resource_id)
            .ok_or_else(|| RepositoryError::not_found("Resource", resource_id))?;
        Ok(resource.remove_project(project_id))
    }

    async fn snapshots_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<ResourceSnapshot>> {
        let state = self.state.read();
        Ok(state
            .resources
            .values()
            .filter_map(|r| state.snapshot(r, date))
            .collect())
    }
}

#[async_trait]
impl OccupationStore for MemoryStore {
    async fn upsert_occupation(
        &self,
        record: &OccupationRecord,
    ) -> RepositoryResult<OccupationRecord> {
        let mut state = self.state.write();
        if !state.resources.contains_key(&record.resource_id) {
            return Err(RepositoryError::InvalidReference(format!(
                "resource {} does not exist",
                record.resource_id
            )));
        }
        if let Some(user_id) = record.updated_by {
            state.check_user(user_id)?;
        }

        let key = (record.resource_id, record.date);
        let existing = state.records.get(&key).and_then(|r| r.id);
        let stored = match existing {
            Some(existing_id) => OccupationRecord {
                id: Some(existing_id),
                ..record.clone()
            },
            None => OccupationRecord {
                id: Some(bump(&mut state.seq.record)),
                ..record.clone()
            },
        };
        state.records.insert(key, stored.clone());
        Ok(stored)
    }

    async fn occupation_for_date(
        &self,
        resource_id: Id,
        date: NaiveDate,
    ) -> RepositoryResult<Option<OccupationRecord>> {
        Ok(self.state.read().records.get(&(resource_id, date)).cloned())
    }

    async fn occupation_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<OccupationListing>> {
        let state = self.state.read();
        let mut listings: Vec<OccupationListing> = state
            .records
            .values()
            .filter(|r| start <= r.date && r.date <= end)
            .map(|r| OccupationListing {
                record: r.clone(),
                resource_found: state.resources.contains_key(&r.resource_id),
                updated_by_email: r
                    .updated_by
                    .and_then(|uid| state.users.get(&uid))
                    .map(|u| u.email.clone()),
            })
            .collect();
        listings.sort_by_key(|l| (l.record.date, l.record.resource_id));
        Ok(listings)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.state.read().users.values().cloned().collect())
    }

    async fn find_user(&self, id: Id) -> RepositoryResult<Option<User>> {
        Ok(self.state.read().users.get(&id).cloned())
    }

    async fn create_user(&self, mut user: User) -> RepositoryResult<User> {
        let mut state = self.state.write();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email {} is already taken",
                user.email
            )));
        }
        state.check_grants(&user.project_access)?;
        let id = bump(&mut state.seq.user);
        user.id = Some(id);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> RepositoryResult<()> {
        let id = user
            .id
            .ok_or_else(|| RepositoryError::not_found("User", 0))?;
        let mut state = self.state.write();
        if !state.users.contains_key(&id) {
            return Err(RepositoryError::not_found("User", id));
        }
        state.check_grants(&user.project_access)?;
        state.users.insert(id, user.clone());
        Ok(())
    }

    async fn upsert_grant(&self, user_id: Id, access: ProjectAccess) -> RepositoryResult<()> {
        let mut state = self.state.write();
        state.check_grants(std::slice::from_ref(&access))?;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| RepositoryError::not_found("User", user_id))?;
        user.grant(access);
        Ok(())
    }
}

#[async_trait]
impl StaffingStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    async fn seeded() -> (MemoryStore, Resource, Project) {
        let store = MemoryStore::new();
        let project = store.create_project(Project::new("APO", "Apollo")).await.unwrap();
        let resource = store.create_resource(Resource::new("Ada")).await.unwrap();
        (store, resource, project)
    }

    #[tokio::test]
    async fn test_ids_are_assigned() {
        let (store, resource, project) = seeded().await;
        assert_eq!(resource.id, Some(1));
        assert_eq!(project.id, Some(1));
        let pole = store.create_pole(Pole::new("Data")).await.unwrap();
        assert_eq!(pole.id, Some(1));
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_record_per_day() {
        let (store, resource, _) = seeded().await;
        let rid = resource.id.unwrap();
        let writer = store
            .create_user(User::new("w@example.com", "W", "R"))
            .await
            .unwrap()
            .id;

        let first = store
            .upsert_occupation(&OccupationRecord::new(rid, day(1), 20, None, Utc::now()))
            .await
            .unwrap();
        let second = store
            .upsert_occupation(&OccupationRecord::new(rid, day(1), 70, writer, Utc::now()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let stored = store.occupation_for_date(rid, day(1)).await.unwrap().unwrap();
        assert_eq!(stored.occupation_rate, 70);
        assert_eq!(stored.updated_by, writer);
        assert_eq!(store.occupation_between(day(1), day(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_references_are_rejected() {
        let (store, mut resource, _) = seeded().await;
        let rid = resource.id.unwrap();

        let err = store
            .upsert_occupation(&OccupationRecord::new(rid, day(1), 20, Some(404), Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)));
        assert!(store.occupation_for_date(rid, day(1)).await.unwrap().is_none());

        resource.project_manager_id = Some(404);
        let err = store.save_resource(&resource).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)));

        let mut orphan = Resource::new("Orphan");
        orphan.project_manager_id = Some(404);
        assert!(store.create_resource(orphan).await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_requires_resource() {
        let store = MemoryStore::new();
        let err = store
            .upsert_occupation(&OccupationRecord::new(42, day(1), 20, None, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_membership_add_and_remove_report_changes() {
        let (store, resource, project) = seeded().await;
        let (rid, pid) = (resource.id.unwrap(), project.id.unwrap());

        assert!(store.add_membership(rid, pid).await.unwrap());
        assert!(!store.add_membership(rid, pid).await.unwrap());
        assert_eq!(store.resources_in_project(pid).await.unwrap().len(), 1);

        assert!(store.remove_membership(rid, pid).await.unwrap());
        assert!(!store.remove_membership(rid, pid).await.unwrap());
        assert!(store.resources_in_project(pid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_records() {
        let (store, resource, _) = seeded().await;
        let rid = resource.id.unwrap();
        store
            .upsert_occupation(&OccupationRecord::new(rid, day(2), 40, None, Utc::now()))
            .await
            .unwrap();

        assert!(store.delete_resource(rid).await.unwrap());
        assert!(!store.delete_resource(rid).await.unwrap());
        assert!(store.occupation_between(day(1), day(30)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_resource_checks_references() {
        let (store, mut resource, _) = seeded().await;
        resource.pole_id = Some(99);
        let err = store.save_resource(&resource).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)));

        let ghost = Resource::new("Ghost");
        assert!(store.save_resource(&ghost).await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_joins_related_names() {
        let (store, resource, project) = seeded().await;
        let pole = store.create_pole(Pole::new("Data")).await.unwrap();
        let pm = store
            .create_user(User::new("pm@example.com", "Pat", "Manager"))
            .await
            .unwrap();

        let mut resource = resource;
        resource.pole_id = pole.id;
        resource.project_manager_id = pm.id;
        resource.add_project(project.id.unwrap());
        resource.set_default_occupation_rate(30.0).unwrap();
        store.save_resource(&resource).await.unwrap();
        store
            .upsert_occupation(&OccupationRecord::new(
                resource.id.unwrap(),
                day(1),
                80,
                None,
                Utc::now(),
            ))
            .await
            .unwrap();

        let snapshots = store.snapshots_for_date(day(1)).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        let snap = &snapshots[0];
        assert_eq!(snap.pole_name.as_deref(), Some("Data"));
        assert_eq!(snap.project_manager_name.as_deref(), Some("Pat Manager"));
        assert_eq!(snap.dated_rate, Some(80));
        assert_eq!(snap.project_names, vec!["Apollo".to_string()]);
        assert_eq!(snap.availability_rate, 70.0);

        let other_day = store.snapshots_for_date(day(2)).await.unwrap();
        assert_eq!(other_day[0].dated_rate, None);
    }

    #[tokio::test]
    async fn test_listing_reports_updater_email() {
        let (store, resource, _) = seeded().await;
        let user = store
            .create_user(User::new("ada@example.com", "Ada", "L"))
            .await
            .unwrap();
        store
            .upsert_occupation(&OccupationRecord::new(
                resource.id.unwrap(),
                day(3),
                10,
                user.id,
                Utc::now(),
            ))
            .await
            .unwrap();

        let listing = store.occupation_between(day(1), day(5)).await.unwrap();
        assert!(listing[0].resource_found);
        assert_eq!(listing[0].updated_by_email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let store = MemoryStore::new();
        store
            .create_user(User::new("a@example.com", "A", "A"))
            .await
            .unwrap();
        let err = store
            .create_user(User::new("a@example.com", "B", "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_upsert_grant_checks_project() {
        let (store, _, project) = seeded().await;
        let user = store
            .create_user(User::new("a@example.com", "A", "A"))
            .await
            .unwrap();
        let uid = user.id.unwrap();

        store
            .upsert_grant(uid, ProjectAccess::new(project.id.unwrap(), true, false))
            .await
            .unwrap();
        assert!(store
            .upsert_grant(uid, ProjectAccess::new(77, true, false))
            .await
            .is_err());

        let user = store.find_user(uid).await.unwrap().unwrap();
        assert_eq!(user.project_access.len(), 1);
    }
}
