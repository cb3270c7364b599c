//! Pole model
//!
//! Table: poles
//!
//! Organizational department. The pole -> resources side is never stored;
//! it is derived from `Resource::pole_id`.

use serde::{Deserialize, Serialize};
use staff_core::traits::{Entity, Id, Identifiable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pole {
    pub id: Option<Id>,
    pub name: String,
}

impl Pole {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Identifiable for Pole {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for Pole {
    const TYPE_NAME: &'static str = "Pole";
}
