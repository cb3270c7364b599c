//! Occupation handlers

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use staff_contracts::dates::{parse_date_or_today, parse_date_range};
use staff_contracts::occupation::{DatedOccupationInput, TodayOccupationInput};
use staff_core::traits::Id;
use staff_core::types::wire_date;

use crate::error::{ApiResult, OperationContext};
use crate::extractors::{ApiJson, AppState, AuthenticatedUser};
use crate::handlers::resources::DateQuery;
use crate::representers::{OccupationEntryRepresentation, TodayOccupationRepresentation};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateForDate {
    id: Id,
    #[serde(with = "wire_date")]
    date: chrono::NaiveDate,
    occupation_rate: i32,
}

/// PATCH /api/resources/:id/occupation
pub async fn record_today(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    ApiJson(input): ApiJson<TodayOccupationInput>,
) -> ApiResult<impl IntoResponse> {
    let rate = input.rate()?;
    let record = state
        .occupation
        .record_today(id, rate, user.id)
        .await
        .in_operation("record_today", &[("resource_id", id), ("user_id", user.id)])?;
    Ok(Json(TodayOccupationRepresentation::from(&record)))
}

/// GET /api/resources/:id/occupation?date=
pub async fn rate_for_date(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
    Query(query): Query<DateQuery>,
) -> ApiResult<impl IntoResponse> {
    let date = parse_date_or_today(query.date.as_deref())?;
    let occupation_rate = state
        .occupation
        .rate_for_date(id, date)
        .await
        .in_operation("rate_for_date", &[("resource_id", id)])?;
    Ok(Json(RateForDate {
        id,
        date,
        occupation_rate,
    }))
}

/// POST /api/resources/:id/occupation-records
pub async fn record_for_date(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    ApiJson(input): ApiJson<DatedOccupationInput>,
) -> ApiResult<impl IntoResponse> {
    let (date, rate) = input.parse()?;
    let entry = state
        .occupation
        .record_entry_for_date(id, date, rate, user.id)
        .await
        .in_operation("record_for_date", &[("resource_id", id), ("user_id", user.id)])?;
    Ok(Json(OccupationEntryRepresentation::from(entry)))
}

/// GET /api/resources/occupation-records?startDate=&endDate=
pub async fn list_records(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<RangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let range = parse_date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let entries = state
        .occupation
        .records_between(range)
        .await
        .in_operation("list_occupation_records", &[])?;
    let body: Vec<OccupationEntryRepresentation> = entries
        .into_iter()
        .map(OccupationEntryRepresentation::listing)
        .collect();
    Ok(Json(body))
}
