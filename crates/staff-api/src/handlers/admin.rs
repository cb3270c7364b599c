//! Admin user handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use staff_core::traits::Id;
use staff_services::{ApprovalRequest, RightsRequest};

use crate::error::{ApiResult, OperationContext};
use crate::extractors::{AdminUser, ApiJsonOrDefault, AppState};
use crate::representers::{AdminUserRepresentation, ApprovalRepresentation, MessageRepresentation};

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    let users = state
        .access
        .list_users()
        .await
        .in_operation("list_users", &[])?;
    let body: Vec<AdminUserRepresentation> = users.iter().map(Into::into).collect();
    Ok(Json(body))
}

/// GET /api/admin/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .access
        .get_user(id)
        .await
        .in_operation("get_user", &[("user_id", id)])?;
    Ok(Json(AdminUserRepresentation::from(&user)))
}

/// PATCH /api/admin/users/:id/approve
pub async fn approve_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Id>,
    ApiJsonOrDefault(request): ApiJsonOrDefault<ApprovalRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state
        .access
        .approve(id, request)
        .await
        .in_operation("approve_user", &[("user_id", id), ("admin_id", admin.id)])?;
    let granted = state
        .access
        .granted_projects(&outcome.user)
        .await
        .in_operation("approve_user", &[("user_id", id)])?;
    tracing::info!(user_id = id, admin_id = admin.id, "approval processed");

    Ok(Json(ApprovalRepresentation::new(
        &outcome.user,
        &granted,
        outcome.skipped_project_ids,
    )))
}

/// PATCH /api/admin/users/:id/update-rights
pub async fn update_rights(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Id>,
    ApiJsonOrDefault(request): ApiJsonOrDefault<RightsRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .access
        .update_rights(id, request)
        .await
        .in_operation("update_rights", &[("user_id", id)])?;
    Ok(Json(MessageRepresentation {
        message: "User rights updated successfully",
    }))
}
