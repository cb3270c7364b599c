//! Project access grants and user approval
//!
//! Reconciliation is computed as a pure [`AccessPlan`] and applied to the
//! user in memory; the store then persists status, profile and grants in one
//! transaction.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use staff_core::result::StaffResult;
use staff_core::traits::Id;
use staff_db::{ProjectStore, UserStore};
use staff_models::{Project, ProjectAccess, User};

use crate::base::{require_project, require_user, SharedStore};

/// One submitted grant. Missing flags mean `false`, never "keep".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest {
    pub id: Id,
    #[serde(default)]
    pub can_edit: Option<bool>,
    #[serde(default)]
    pub can_consult: Option<bool>,
}

impl GrantRequest {
    fn to_access(&self) -> ProjectAccess {
        ProjectAccess::new(
            self.id,
            self.can_edit.unwrap_or(false),
            self.can_consult.unwrap_or(false),
        )
    }
}

/// Body of the approval endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub position: Option<String>,
    pub skills: Option<Vec<String>>,
    /// When absent, existing grants are left alone
    pub projects: Option<Vec<GrantRequest>>,
}

/// Body of the single-grant endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightsRequest {
    pub project_id: Option<Id>,
    #[serde(default)]
    pub can_edit: Option<bool>,
    #[serde(default)]
    pub can_consult: Option<bool>,
}

/// Target grant set derived from a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPlan {
    /// Grants to upsert, ordered by project id
    pub upserts: Vec<ProjectAccess>,
    /// Currently granted projects missing from the submission
    pub revocations: Vec<Id>,
    /// Submitted project ids that do not exist
    pub skipped: Vec<Id>,
}

impl AccessPlan {
    /// Later entries for the same project win.
    pub fn compute(
        current: &[ProjectAccess],
        submitted: &[GrantRequest],
        known_projects: &BTreeSet<Id>,
    ) -> Self {
        let mut upserts: BTreeMap<Id, ProjectAccess> = BTreeMap::new();
        let mut skipped = Vec::new();

        for grant in submitted {
            if known_projects.contains(&grant.id) {
                upserts.insert(grant.id, grant.to_access());
            } else if !skipped.contains(&grant.id) {
                skipped.push(grant.id);
            }
        }

        let submitted_ids: BTreeSet<Id> = submitted.iter().map(|g| g.id).collect();
        let revocations = current
            .iter()
            .map(|a| a.project_id)
            .filter(|id| !submitted_ids.contains(id))
            .collect();

        Self {
            upserts: upserts.into_values().collect(),
            revocations,
            skipped,
        }
    }

    pub fn apply(&self, user: &mut User) {
        for project_id in &self.revocations {
            user.revoke(*project_id);
        }
        for access in &self.upserts {
            user.grant(*access);
        }
    }
}

/// Result of an approval
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub user: User,
    /// Submitted project ids that were ignored because they do not exist
    pub skipped_project_ids: Vec<Id>,
}

#[derive(Clone)]
pub struct AccessService {
    store: SharedStore,
}

impl AccessService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list_users(&self) -> StaffResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    pub async fn get_user(&self, user_id: Id) -> StaffResult<User> {
        require_user(&*self.store, user_id).await
    }

    /// Approve and activate a user, optionally updating profile and
    /// reconciling grants. Everything is written in one transaction.
    pub async fn approve(&self, user_id: Id, request: ApprovalRequest) -> StaffResult<ApprovalOutcome> {
        let mut user = require_user(&*self.store, user_id).await?;

        if let Some(position) = request.position {
            user.position = Some(position);
        }
        if let Some(skills) = request.skills {
            user.skills = skills;
        }

        let mut skipped_project_ids = Vec::new();
        if let Some(ref submitted) = request.projects {
            let ids: Vec<Id> = submitted.iter().map(|g| g.id).collect();
            let known: BTreeSet<Id> = self
                .store
                .find_projects(&ids)
                .await?
                .into_iter()
                .filter_map(|p| p.id)
                .collect();

            let plan = AccessPlan::compute(&user.project_access, submitted, &known);
            for project_id in &plan.skipped {
                tracing::warn!(user_id, project_id, "unknown project in approval, skipping grant");
            }
            plan.apply(&mut user);
            skipped_project_ids = plan.skipped;
        }

        user.approve();
        self.store.save_user(&user).await?;

        tracing::info!(
            user_id,
            grants = user.project_access.len(),
            skipped = skipped_project_ids.len(),
            "user approved"
        );

        Ok(ApprovalOutcome {
            user,
            skipped_project_ids,
        })
    }

    /// The user's grants joined with their projects, in project id order
    pub async fn granted_projects(&self, user: &User) -> StaffResult<Vec<(ProjectAccess, Project)>> {
        let projects: BTreeMap<Id, Project> = self
            .store
            .find_projects(&user.granted_project_ids())
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        Ok(user
            .project_access
            .iter()
            .filter_map(|access| {
                projects
                    .get(&access.project_id)
                    .map(|project| (*access, project.clone()))
            })
            .collect())
    }

    /// Upsert one grant. Unlike approval, an unknown project is an error.
    pub async fn update_rights(&self, user_id: Id, request: RightsRequest) -> StaffResult<User> {
        let user = require_user(&*self.store, user_id).await?;

        let Some(project_id) = request.project_id else {
            return Ok(user);
        };
        require_project(&*self.store, project_id).await?;

        let access = ProjectAccess::new(
            project_id,
            request.can_edit.unwrap_or(false),
            request.can_consult.unwrap_or(false),
        );
        self.store.upsert_grant(user_id, access).await?;

        tracing::info!(user_id, project_id, "user rights updated");
        require_user(&*self.store, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use staff_core::types::UserStatus;

    fn grant(id: Id, can_edit: Option<bool>, can_consult: Option<bool>) -> GrantRequest {
        GrantRequest {
            id,
            can_edit,
            can_consult,
        }
    }

    #[test]
    fn test_plan_reconciles_current_grants() {
        let current = vec![
            ProjectAccess::new(1, false, true),
            ProjectAccess::new(3, true, true),
        ];
        let submitted = vec![grant(1, Some(true), None), grant(2, Some(false), None)];
        let known: BTreeSet<Id> = [1, 2, 3].into_iter().collect();

        let plan = AccessPlan::compute(&current, &submitted, &known);

        assert_eq!(
            plan.upserts,
            vec![
                ProjectAccess::new(1, true, false),
                ProjectAccess::new(2, false, false),
            ]
        );
        assert_eq!(plan.revocations, vec![3]);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_plan_skips_unknown_projects() {
        let known: BTreeSet<Id> = [1].into_iter().collect();
        let submitted = vec![grant(1, None, None), grant(9, None, None), grant(9, None, None)];
        let plan = AccessPlan::compute(&[], &submitted, &known);
        assert_eq!(plan.upserts.len(), 1);
        assert_eq!(plan.skipped, vec![9]);
    }

    #[tokio::test]
    async fn test_approve_reconciles_and_activates() {
        let store = fixtures::store();
        let p1 = fixtures::project(&store, "P1", "One").await;
        let p2 = fixtures::project(&store, "P2", "Two").await;
        let p3 = fixtures::project(&store, "P3", "Three").await;
        let uid = fixtures::user(&store, "new@example.com", "New", "User").await;

        store.upsert_grant(uid, ProjectAccess::new(p1, false, true)).await.unwrap();
        store.upsert_grant(uid, ProjectAccess::new(p3, true, true)).await.unwrap();

        let service = AccessService::new(store.clone());
        let outcome = service
            .approve(
                uid,
                ApprovalRequest {
                    position: Some("Engineer".into()),
                    skills: Some(vec!["rust".into()]),
                    projects: Some(vec![
                        grant(p1, Some(true), None),
                        grant(p2, Some(false), None),
                        grant(404, Some(true), Some(true)),
                    ]),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.skipped_project_ids, vec![404]);

        let user = service.get_user(uid).await.unwrap();
        assert_eq!(user.status, UserStatus::Approved);
        assert!(user.is_active);
        assert_eq!(user.position.as_deref(), Some("Engineer"));
        assert_eq!(user.skills, vec!["rust".to_string()]);
        assert_eq!(
            user.project_access,
            vec![
                ProjectAccess::new(p1, true, false),
                ProjectAccess::new(p2, false, false),
            ]
        );

        let granted = service.granted_projects(&user).await.unwrap();
        let codes: Vec<_> = granted.iter().map(|(_, p)| p.code.as_str()).collect();
        assert_eq!(codes, vec!["P1", "P2"]);
        assert!(granted[0].0.can_edit);
    }

    #[tokio::test]
    async fn test_approve_without_projects_keeps_grants() {
        let store = fixtures::store();
        let p1 = fixtures::project(&store, "P1", "One").await;
        let uid = fixtures::user(&store, "u@example.com", "U", "U").await;
        store.upsert_grant(uid, ProjectAccess::new(p1, true, true)).await.unwrap();

        let service = AccessService::new(store);
        let outcome = service.approve(uid, ApprovalRequest::default()).await.unwrap();

        assert_eq!(outcome.user.project_access.len(), 1);
        assert!(outcome.user.status.is_approved());
    }

    #[tokio::test]
    async fn test_approve_unknown_user() {
        let service = AccessService::new(fixtures::store());
        let err = service.approve(5, ApprovalRequest::default()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_update_rights() {
        let store = fixtures::store();
        let p1 = fixtures::project(&store, "P1", "One").await;
        let uid = fixtures::user(&store, "u@example.com", "U", "U").await;
        let service = AccessService::new(store);

        let user = service
            .update_rights(
                uid,
                RightsRequest {
                    project_id: Some(p1),
                    can_edit: None,
                    can_consult: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(user.project_access, vec![ProjectAccess::new(p1, false, true)]);

        let err = service
            .update_rights(
                uid,
                RightsRequest {
                    project_id: Some(99),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let unchanged = service
            .update_rights(uid, RightsRequest::default())
            .await
            .unwrap();
        assert_eq!(unchanged.project_access.len(), 1);
    }
}
