//! Test seeding helpers

use std::sync::Arc;

use staff_core::traits::Id;
use staff_db::{MemoryStore, PoleStore, ProjectStore, ResourceStore, UserStore};
use staff_models::{Pole, Project, Resource, User};

use crate::base::SharedStore;

pub(crate) fn store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

pub(crate) async fn pole(store: &SharedStore, name: &str) -> Id {
    store.create_pole(Pole::new(name)).await.unwrap().id.unwrap()
}

pub(crate) async fn project(store: &SharedStore, code: &str, name: &str) -> Id {
    store
        .create_project(Project::new(code, name))
        .await
        .unwrap()
        .id
        .unwrap()
}

pub(crate) async fn user(store: &SharedStore, email: &str, first: &str, last: &str) -> Id {
    store
        .create_user(User::new(email, first, last))
        .await
        .unwrap()
        .id
        .unwrap()
}

pub(crate) async fn resource(
    store: &SharedStore,
    name: &str,
    pole_id: Option<Id>,
    default_rate: f64,
) -> Id {
    let mut resource = Resource::new(name);
    resource.pole_id = pole_id;
    resource.set_default_occupation_rate(default_rate).unwrap();
    store.create_resource(resource).await.unwrap().id.unwrap()
}
