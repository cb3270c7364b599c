//! User model
//!
//! Table: users, user_project_access
//!
//! Users are created by the identity provider and approved by an admin.
//! Each user holds at most one [`ProjectAccess`] grant per project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use staff_core::traits::{Entity, Id, Identifiable};
use staff_core::types::UserStatus;
use validator::Validate;

/// Access grant of one user on one project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAccess {
    pub project_id: Id,
    pub can_edit: bool,
    pub can_consult: bool,
}

impl ProjectAccess {
    pub fn new(project_id: Id, can_edit: bool, can_consult: bool) -> Self {
        Self {
            project_id,
            can_edit,
            can_consult,
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<Id>,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 255))]
    pub first_name: String,

    #[validate(length(max = 255))]
    pub last_name: String,

    pub status: UserStatus,

    pub is_active: bool,

    pub position: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    pub created_at: DateTime<Utc>,

    /// Ordered by project id
    #[serde(default)]
    pub project_access: Vec<ProjectAccess>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            status: UserStatus::Pending,
            is_active: false,
            position: None,
            skills: Vec::new(),
            created_at: Utc::now(),
            project_access: Vec::new(),
        }
    }

    /// "First Last", trimmed when one part is empty
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn approve(&mut self) {
        self.status = UserStatus::Approved;
        self.is_active = true;
    }

    pub fn access_for(&self, project_id: Id) -> Option<&ProjectAccess> {
        self.project_access
            .iter()
            .find(|a| a.project_id == project_id)
    }

    /// Insert or overwrite the grant for `access.project_id`
    pub fn grant(&mut self, access: ProjectAccess) {
        match self
            .project_access
            .binary_search_by_key(&access.project_id, |a| a.project_id)
        {
            Ok(idx) => self.project_access[idx] = access,
            Err(idx) => self.project_access.insert(idx, access),
        }
    }

    /// Returns whether a grant was removed
    pub fn revoke(&mut self, project_id: Id) -> bool {
        let before = self.project_access.len();
        self.project_access.retain(|a| a.project_id != project_id);
        before != self.project_access.len()
    }

    pub fn granted_project_ids(&self) -> Vec<Id> {
        self.project_access.iter().map(|a| a.project_id).collect()
    }
}

impl Identifiable for User {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for User {
    const TYPE_NAME: &'static str = "User";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_pending_and_inactive() {
        let user = User::new("ada@example.com", "Ada", "Lovelace");
        assert_eq!(user.status, UserStatus::Pending);
        assert!(!user.is_active);
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_approve_activates() {
        let mut user = User::new("ada@example.com", "Ada", "Lovelace");
        user.approve();
        assert_eq!(user.status, UserStatus::Approved);
        assert!(user.is_active);
    }

    #[test]
    fn test_grant_overwrites_existing_project() {
        let mut user = User::new("ada@example.com", "Ada", "");
        user.grant(ProjectAccess::new(3, true, true));
        user.grant(ProjectAccess::new(1, false, true));
        user.grant(ProjectAccess::new(3, false, false));

        assert_eq!(user.granted_project_ids(), vec![1, 3]);
        assert_eq!(user.access_for(3), Some(&ProjectAccess::new(3, false, false)));
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn test_revoke() {
        let mut user = User::new("ada@example.com", "Ada", "Lovelace");
        user.grant(ProjectAccess::new(1, true, false));
        assert!(user.revoke(1));
        assert!(!user.revoke(1));
        assert!(user.project_access.is_empty());
    }

    #[test]
    fn test_email_validation() {
        assert!(User::new("not-an-email", "A", "B").validate().is_err());
        assert!(User::new("a@b.io", "A", "B").validate().is_ok());
    }
}
