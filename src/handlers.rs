use crate::challenges;
use crate::community::community_impact;
use crate::errors::AppError;
use crate::estimator::estimate_co2;
use crate::models::{
    ActionRecord, Category, Challenge, ChallengeView, CommunityImpact, EstimateRequest,
    EstimateResponse, LeaderboardEntry, NewAction, NewChallenge, StatsQuery, StatsResponse,
    TimelineEntry, TimelineQuery,
};
use crate::state::AppState;
use crate::stats::{
    build_snapshot, clamp_days, timeline, DEFAULT_TIMELINE_LIMIT, RECENT_ACTIVITY_LIMIT,
};
use crate::storage::{insert_action, leaderboard, list_actions};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn estimate(
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse>, AppError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let category = payload
        .category
        .parse::<Category>()
        .map_err(AppError::bad_request)?;
    if !payload.value.is_finite() || payload.value < 0.0 {
        return Err(AppError::bad_request("value must be a non-negative number"));
    }

    Ok(Json(EstimateResponse {
        category,
        co2_saved: estimate_co2(category, &payload.description, payload.value),
    }))
}

pub async fn list_user_actions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<ActionRecord>> {
    let data = state.store.lock().await;
    Json(list_actions(&data, &user_id))
}

pub async fn log_action(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<NewAction>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionRecord>), AppError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let pending = payload.validate(today()).map_err(AppError::bad_request)?;
    let co2_saved = estimate_co2(pending.category, &pending.description, pending.value);

    let mut data = state.store.lock().await;
    let mut next = data.clone();
    let record = insert_action(&mut next, &user_id, pending, co2_saved);
    state.save(&next).await?;
    *data = next;

    info!(
        user_id = %record.user_id,
        category = %record.category,
        co2_saved = record.co2_saved,
        action_date = %record.action_date,
        "action logged"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let data = state.store.lock().await;
    let actions = list_actions(&data, &user_id);
    drop(data);

    Json(StatsResponse {
        snapshot: build_snapshot(&actions, clamp_days(query.days)),
        recent_activities: timeline(&actions, RECENT_ACTIVITY_LIMIT),
    })
}

pub async fn get_timeline(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<TimelineQuery>,
) -> Json<Vec<TimelineEntry>> {
    let data = state.store.lock().await;
    let actions = list_actions(&data, &user_id);
    Json(timeline(&actions, query.limit.unwrap_or(DEFAULT_TIMELINE_LIMIT)))
}

pub async fn get_community(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<CommunityImpact> {
    let data = state.store.lock().await;
    let ranked = leaderboard(&data);
    Json(community_impact(&ranked, &user_id))
}

pub async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    let data = state.store.lock().await;
    Json(leaderboard(&data))
}

pub async fn create_challenge(
    State(state): State<AppState>,
    payload: Result<Json<NewChallenge>, JsonRejection>,
) -> Result<(StatusCode, Json<Challenge>), AppError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let mut data = state.store.lock().await;
    let mut next = data.clone();
    let challenge = challenges::create_challenge(&mut next, payload)?;
    state.save(&next).await?;
    *data = next;

    info!(challenge_id = %challenge.id, name = %challenge.name, "challenge created");
    Ok((StatusCode::CREATED, Json(challenge)))
}

pub async fn list_challenges(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<ChallengeView>> {
    let data = state.store.lock().await;
    Json(challenges::list_challenges(&data, &user_id, today()))
}

pub async fn join_challenge(
    State(state): State<AppState>,
    Path((user_id, challenge_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let mut data = state.store.lock().await;
    let mut next = data.clone();
    challenges::join(&mut next, challenge_id, &user_id)?;
    state.save(&next).await?;
    *data = next;

    info!(%user_id, %challenge_id, "joined challenge");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn leave_challenge(
    State(state): State<AppState>,
    Path((user_id, challenge_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let mut data = state.store.lock().await;
    let mut next = data.clone();
    challenges::leave(&mut next, challenge_id, &user_id)?;
    state.save(&next).await?;
    *data = next;

    info!(%user_id, %challenge_id, "left challenge");
    Ok(StatusCode::NO_CONTENT)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn bad_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}
