//! Axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use staff_auth::{extract_bearer_token, CurrentUser, JwtError, JwtService};
use staff_core::config::StaffingConfig;
use staff_services::{
    AccessService, AggregationService, MembershipService, OccupationService, ProjectService,
    ResourceService, SharedStore,
};

use crate::error::ApiError;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtService>,
    pub resources: ResourceService,
    pub occupation: OccupationService,
    pub aggregation: AggregationService,
    pub projects: ProjectService,
    pub membership: MembershipService,
    pub access: AccessService,
}

impl AppState {
    pub fn new(store: SharedStore, jwt: JwtService, staffing: StaffingConfig) -> Self {
        Self {
            jwt: Arc::new(jwt),
            resources: ResourceService::new(store.clone()),
            occupation: OccupationService::new(store.clone()),
            aggregation: AggregationService::new(store.clone(), staffing),
            projects: ProjectService::new(store.clone()),
            membership: MembershipService::new(store.clone()),
            access: AccessService::new(store),
        }
    }
}

/// Caller resolved from the `Authorization: Bearer` header
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or(JwtError::Missing)?;

        let claims = app_state.jwt.validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            e
        })?;

        Ok(AuthenticatedUser(CurrentUser::from_claims(&claims)?))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Authenticated caller holding the `admin` claim
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        user.require_admin()?;
        Ok(AdminUser(user))
    }
}

/// JSON body whose rejections use the API error shape
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// JSON body where an absent or blank body means `T::default()`
pub struct ApiJsonOrDefault<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiJsonOrDefault(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ApiJsonOrDefault(value))
    }
}
