//! API routes

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{admin, occupation, projects, resources};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api", api_router())
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/resources", resources_router())
        .nest("/projects", projects_router())
        .nest("/admin", admin_router())
        .route("/poles", get(resources::list_poles))
}

fn resources_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(resources::list_resources).post(resources::create_resource),
        )
        .route("/all", get(resources::list_all_resources))
        .route("/grouped-by-pole", get(resources::grouped_by_pole))
        .route("/occupation-records", get(occupation::list_records))
        .route(
            "/:id",
            get(resources::get_resource)
                .put(resources::update_resource)
                .delete(resources::delete_resource),
        )
        .route(
            "/:id/occupation",
            get(occupation::rate_for_date).patch(occupation::record_today),
        )
        .route("/:id/occupation-records", post(occupation::record_for_date))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects))
        .route("/:id", get(projects::get_project))
        .route(
            "/:id/resources/:resource_id",
            post(projects::add_resource).delete(projects::remove_resource),
        )
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/:id", get(admin::get_user))
        .route("/users/:id/approve", patch(admin::approve_user))
        .route("/users/:id/update-rights", patch(admin::update_rights))
}
