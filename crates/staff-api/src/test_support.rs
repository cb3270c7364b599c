//! Router test harness over the in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use staff_auth::JwtService;
use staff_core::config::StaffingConfig;
use staff_core::traits::Id;
use staff_db::{MemoryStore, ResourceStore, UserStore};
use staff_models::{Resource, User};
use staff_services::SharedStore;
use tower::ServiceExt;

use crate::extractors::AppState;
use crate::routes::router;

const SECRET: &[u8] = b"router-test-secret-of-sufficient-length";

pub(crate) struct TestApp {
    pub store: SharedStore,
    router: Router,
    token: String,
    admin_token: String,
}

impl TestApp {
    /// Fresh store with one pending user, "Pat Manager", acting on every
    /// request
    pub async fn new() -> Self {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let user_id = store
            .create_user(User::new("pm@example.com", "Pat", "Manager"))
            .await
            .unwrap()
            .id
            .unwrap();

        let jwt = JwtService::new(SECRET);
        let token = jwt
            .create_token(user_id, Some("pm@example.com".into()), false, 3600)
            .unwrap();
        let admin_token = jwt
            .create_token(user_id, Some("pm@example.com".into()), true, 3600)
            .unwrap();

        let state = AppState::new(store.clone(), jwt, StaffingConfig::default());
        Self {
            store,
            router: router().with_state(state),
            token,
            admin_token,
        }
    }

    pub async fn resource(&self, name: &str, pole_id: Option<Id>, default_rate: f64) -> Id {
        let mut resource = Resource::new(name);
        resource.pole_id = pole_id;
        resource.set_default_occupation_rate(default_rate).unwrap();
        self.store.create_resource(resource).await.unwrap().id.unwrap()
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(method, uri, body, Some(&self.token)).await
    }

    pub async fn send_as_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(method, uri, body, Some(&self.admin_token)).await
    }

    pub async fn send_anonymous(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        self.request(method, uri, None, None).await
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
