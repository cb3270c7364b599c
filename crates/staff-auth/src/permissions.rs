//! Acting user context

use staff_core::error::StaffError;
use staff_core::traits::Id;

use crate::jwt::{Claims, JwtError};

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Id,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl CurrentUser {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            email: None,
            is_admin: false,
        }
    }

    pub fn admin(id: Id) -> Self {
        Self {
            is_admin: true,
            ..Self::new(id)
        }
    }

    pub fn from_claims(claims: &Claims) -> Result<Self, JwtError> {
        Ok(Self {
            id: claims.user_id()?,
            email: claims.email.clone(),
            is_admin: claims.admin,
        })
    }

    pub fn require_admin(&self) -> Result<(), StaffError> {
        if self.is_admin {
            Ok(())
        } else {
            tracing::debug!(user_id = self.id, "admin endpoint refused");
            Err(StaffError::forbidden("Admin access required"))
        }
    }
}
