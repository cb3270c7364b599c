//! User representers for the admin endpoints

use chrono::{DateTime, Utc};
use serde::Serialize;
use staff_core::traits::Id;
use staff_core::types::{wire_timestamp, UserStatus};
use staff_models::{Project, ProjectAccess, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRepresentation {
    pub project_id: Id,
    pub can_edit: bool,
    pub can_consult: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRepresentation {
    pub id: Option<Id>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: UserStatus,
    pub is_active: bool,
    pub projects: Vec<GrantRepresentation>,
    #[serde(with = "wire_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for AdminUserRepresentation {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            status: user.status,
            is_active: user.is_active,
            projects: user
                .project_access
                .iter()
                .map(|a| GrantRepresentation {
                    project_id: a.project_id,
                    can_edit: a.can_edit,
                    can_consult: a.can_consult,
                })
                .collect(),
            created_at: user.created_at,
        }
    }
}

/// Granted project as shown after approval
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantedProjectRepresentation {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub can_consult: bool,
    pub can_edit: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedUserRepresentation {
    pub id: Option<Id>,
    pub email: String,
    pub position: Option<String>,
    pub skills: Vec<String>,
    pub status: UserStatus,
    pub projects: Vec<GrantedProjectRepresentation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRepresentation {
    pub message: &'static str,
    pub user: ApprovedUserRepresentation,
    pub skipped_project_ids: Vec<Id>,
}

impl ApprovalRepresentation {
    pub fn new(user: &User, granted: &[(ProjectAccess, Project)], skipped_project_ids: Vec<Id>) -> Self {
        Self {
            message: "User approved successfully",
            user: ApprovedUserRepresentation {
                id: user.id,
                email: user.email.clone(),
                position: user.position.clone(),
                skills: user.skills.clone(),
                status: user.status,
                projects: granted
                    .iter()
                    .map(|(access, project)| GrantedProjectRepresentation {
                        id: access.project_id,
                        code: project.code.clone(),
                        name: project.name.clone(),
                        can_consult: access.can_consult,
                        can_edit: access.can_edit,
                    })
                    .collect(),
            },
            skipped_project_ids,
        }
    }
}
