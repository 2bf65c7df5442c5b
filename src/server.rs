//! HTTP surface: `/schedule` and `/scores` over a shared [`FeedService`].

use crate::error::FeedError;
use crate::models::League;
use crate::{parse_start_date, FeedService};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

pub type AppState = Arc<FeedService>;

pub const ROOT_MESSAGE: &str = "API is running. Try /schedule?startDate=YYYY-MM-DD";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/schedule", get(schedule))
        .route("/scores", get(scores))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParams {
    pub start_date: Option<String>,
    pub league: Option<String>,
    pub upcoming_only: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresParams {
    pub event_id: Option<String>,
    pub start_date: Option<String>,
    pub league: Option<String>,
}

/// JSON `{ "error": ... }` body with its status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn root() -> &'static str {
    ROOT_MESSAGE
}

async fn schedule(
    State(service): State<AppState>,
    Query(params): Query<ScheduleParams>,
) -> Result<Response, ApiError> {
    let raw_date = non_blank(params.start_date.as_deref())
        .ok_or_else(|| ApiError::bad_request("Missing startDate parameter"))?;
    let start = parse_start_date(raw_date)
        .ok_or_else(|| ApiError::bad_request("Invalid startDate format"))?;
    let league = parse_league(params.league.as_deref())?.unwrap_or(League::Nfl);
    let upcoming = non_blank(params.upcoming_only.as_deref()).is_some_and(is_truthy);

    match service.schedule(start, league, upcoming).await {
        Ok(games) => Ok(Json(games).into_response()),
        Err(FeedError::InvalidRequest(message)) => Err(ApiError::bad_request(message)),
        Err(err) => {
            error!("Schedule request for {} {} failed: {}", league, start, err);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch schedule",
            ))
        }
    }
}

async fn scores(
    State(service): State<AppState>,
    Query(params): Query<ScoresParams>,
) -> Result<Response, ApiError> {
    let missing = || ApiError::bad_request("Missing eventId or startDate");
    let event_id = non_blank(params.event_id.as_deref()).ok_or_else(missing)?;
    let raw_date = non_blank(params.start_date.as_deref()).ok_or_else(missing)?;
    let start = parse_start_date(raw_date)
        .ok_or_else(|| ApiError::bad_request("Invalid startDate format"))?;
    let hint = parse_league(params.league.as_deref())?;

    match service.game_score(event_id, start, hint).await {
        Ok(score) => Ok(Json(score).into_response()),
        Err(FeedError::InvalidRequest(message)) => Err(ApiError::bad_request(message)),
        Err(FeedError::NotFound) => Err(ApiError::new(StatusCode::NOT_FOUND, "Game not found")),
        Err(err) => {
            error!("Score request for {} failed: {}", event_id, err);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch game",
            ))
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_league(raw: Option<&str>) -> Result<Option<League>, ApiError> {
    non_blank(raw)
        .map(|value| value.parse::<League>().map_err(ApiError::bad_request))
        .transpose()
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
