//! Project and membership handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use staff_core::traits::Id;

use crate::error::{ApiResult, OperationContext};
use crate::extractors::{AppState, AuthenticatedUser};
use crate::representers::{MessageRepresentation, ProjectRepresentation};

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let projects = state
        .projects
        .list()
        .await
        .in_operation("list_projects", &[])?;
    let body: Vec<ProjectRepresentation> = projects.iter().map(Into::into).collect();
    Ok(Json(body))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let details = state
        .projects
        .get(id)
        .await
        .in_operation("get_project", &[("project_id", id)])?;
    Ok(Json(ProjectRepresentation::from(&details)))
}

/// POST /api/projects/:id/resources/:resource_id
pub async fn add_resource(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path((project_id, resource_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    state
        .membership
        .add(project_id, resource_id)
        .await
        .in_operation(
            "add_membership",
            &[("project_id", project_id), ("resource_id", resource_id)],
        )?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRepresentation {
            message: "Resource assigned to project",
        }),
    ))
}

/// DELETE /api/projects/:id/resources/:resource_id
pub async fn remove_resource(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path((project_id, resource_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    state
        .membership
        .remove(project_id, resource_id)
        .await
        .in_operation(
            "remove_membership",
            &[("project_id", project_id), ("resource_id", resource_id)],
        )?;
    Ok(StatusCode::NO_CONTENT)
}
