//! Project model
//!
//! Table: projects

use serde::{Deserialize, Serialize};
use staff_core::traits::{Entity, Id, Identifiable};
use validator::Validate;

/// Project entity
///
/// `required_skills` is informational; nothing matches resources against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 50))]
    pub code: String,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl Project {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            required_skills: Vec::new(),
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for Project {
    const TYPE_NAME: &'static str = "Project";
}
