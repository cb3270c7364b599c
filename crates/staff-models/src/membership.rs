//! Project -> resources index
//!
//! Membership is stored once, on the resource (`Resource::project_ids`).
//! This index is the derived inverse, rebuilt from a resource slice whenever
//! a project-centric view is needed.

use std::collections::{BTreeMap, BTreeSet};

use staff_core::traits::Id;

use crate::resource::Resource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMembershipIndex {
    by_project: BTreeMap<Id, BTreeSet<Id>>,
}

impl ProjectMembershipIndex {
    pub fn build<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Self {
        let mut by_project: BTreeMap<Id, BTreeSet<Id>> = BTreeMap::new();
        for resource in resources {
            let Some(resource_id) = resource.id else {
                continue;
            };
            for project_id in &resource.project_ids {
                by_project.entry(*project_id).or_default().insert(resource_id);
            }
        }
        Self { by_project }
    }

    /// Resource ids assigned to `project_id`, ascending
    pub fn resources_of(&self, project_id: Id) -> Vec<Id> {
        self.by_project
            .get(&project_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, project_id: Id, resource_id: Id) -> bool {
        self.by_project
            .get(&project_id)
            .is_some_and(|ids| ids.contains(&resource_id))
    }

    pub fn project_count(&self) -> usize {
        self.by_project.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: Id, projects: &[Id]) -> Resource {
        let mut r = Resource::new(format!("R{id}"));
        r.id = Some(id);
        for p in projects {
            r.add_project(*p);
        }
        r
    }

    #[test]
    fn test_index_inverts_resource_membership() {
        let resources = vec![resource(1, &[10, 20]), resource(2, &[20]), resource(3, &[])];
        let index = ProjectMembershipIndex::build(&resources);

        assert_eq!(index.resources_of(10), vec![1]);
        assert_eq!(index.resources_of(20), vec![1, 2]);
        assert!(index.resources_of(30).is_empty());
        assert!(index.contains(20, 2));
        assert!(!index.contains(10, 2));
        assert_eq!(index.project_count(), 2);
    }

    #[test]
    fn test_unsaved_resources_are_ignored() {
        let mut r = Resource::new("Draft");
        r.add_project(1);
        let index = ProjectMembershipIndex::build([&r]);
        assert_eq!(index.project_count(), 0);
    }
}
