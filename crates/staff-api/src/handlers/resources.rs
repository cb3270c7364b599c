//! Resource and pole handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use staff_contracts::dates::parse_date_or_today;
use staff_core::traits::Id;
use staff_core::types::today;
use staff_models::{NewResource, ResourceChanges};

use crate::error::{ApiError, ApiResult, OperationContext};
use crate::extractors::{ApiJson, AppState, AuthenticatedUser};
use crate::representers::{NamedRef, ResourceDetailRepresentation, ResourceSummaryRepresentation};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListQuery {
    pub project_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// GET /api/resources
///
/// With `?projectId=` the project's resources, otherwise today's pole view.
pub async fn list_resources(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ResourceListQuery>,
) -> ApiResult<Response> {
    match query.project_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let project_id: Id = raw
                .parse()
                .map_err(|_| ApiError::bad_request("projectId must be an integer"))?;
            let details = state
                .resources
                .list_in_project(project_id)
                .await
                .in_operation("list_project_resources", &[("project_id", project_id)])?;
            let body: Vec<ResourceDetailRepresentation> = details.iter().map(Into::into).collect();
            Ok(Json(body).into_response())
        }
        None => {
            let groups = state
                .aggregation
                .grouped_by_pole(today())
                .await
                .in_operation("grouped_by_pole", &[])?;
            Ok(Json(groups).into_response())
        }
    }
}

/// GET /api/resources/grouped-by-pole
pub async fn grouped_by_pole(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<DateQuery>,
) -> ApiResult<impl IntoResponse> {
    let date = parse_date_or_today(query.date.as_deref())?;
    let groups = state
        .aggregation
        .grouped_by_pole(date)
        .await
        .in_operation("grouped_by_pole", &[])?;
    Ok(Json(groups))
}

/// GET /api/resources/all
pub async fn list_all_resources(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let details = state
        .resources
        .list_all()
        .await
        .in_operation("list_all_resources", &[])?;
    let body: Vec<ResourceSummaryRepresentation> = details.iter().map(Into::into).collect();
    Ok(Json(body))
}

/// GET /api/resources/:id
pub async fn get_resource(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let details = state
        .resources
        .get(id)
        .await
        .in_operation("get_resource", &[("resource_id", id)])?;
    Ok(Json(ResourceDetailRepresentation::from(&details)))
}

/// POST /api/resources
pub async fn create_resource(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<NewResource>,
) -> ApiResult<impl IntoResponse> {
    let details = state
        .resources
        .create(input, user.id)
        .await
        .in_operation("create_resource", &[("user_id", user.id)])?;
    Ok((
        StatusCode::CREATED,
        Json(ResourceDetailRepresentation::from(&details)),
    ))
}

/// PUT /api/resources/:id
pub async fn update_resource(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    ApiJson(changes): ApiJson<ResourceChanges>,
) -> ApiResult<impl IntoResponse> {
    let details = state
        .resources
        .update(id, changes, user.id)
        .await
        .in_operation("update_resource", &[("resource_id", id), ("user_id", user.id)])?;
    Ok(Json(ResourceDetailRepresentation::from(&details)))
}

/// DELETE /api/resources/:id
pub async fn delete_resource(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    state
        .resources
        .delete(id)
        .await
        .in_operation("delete_resource", &[("resource_id", id)])?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/poles
pub async fn list_poles(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let poles = state
        .resources
        .list_poles()
        .await
        .in_operation("list_poles", &[])?;
    let body: Vec<NamedRef> = poles.iter().filter_map(NamedRef::pole).collect();
    Ok(Json(body))
}
