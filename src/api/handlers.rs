use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{
    Action, AnalysisReport, CatalogItem, Feed, Interaction, PreferenceCategory, Preferences,
    UserId, UserProfile,
};
use crate::services::{PersonalizationEngine, DEFAULT_LIMIT};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub item_id: String,
    pub rating: u8,
}

#[derive(Debug, Deserialize)]
pub struct RecordInteractionRequest {
    pub item_id: String,
    pub action: Action,
    pub rating: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct AddPreferenceRequest {
    pub category: PreferenceCategory,
    pub value: String,
}

/// Runs a store-backed engine call on the blocking pool
async fn run_blocking<T, F>(engine: &PersonalizationEngine, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(PersonalizationEngine) -> AppResult<T> + Send + 'static,
{
    let engine = engine.clone();
    tokio::task::spawn_blocking(move || f(engine))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

/// Runs a load-mutate-save cycle on the blocking pool under the user's write lock
///
/// The guard moves into the blocking task and is released only after `f` returns,
/// so a dropped request cannot free the lock while its save is still running.
async fn run_locked<T, F>(state: &AppState, user_id: UserId, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(PersonalizationEngine, &UserId) -> AppResult<T> + Send + 'static,
{
    let guard = state.lock_user(&user_id).await;
    let engine = state.engine.clone();
    tokio::task::spawn_blocking(move || {
        let result = f(engine, &user_id);
        drop(guard);
        result
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

fn latest_interaction(profile: UserProfile) -> AppResult<Interaction> {
    profile
        .history
        .into_iter()
        .last()
        .ok_or_else(|| AppError::Internal("Interaction missing after save".to_string()))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get the stored (or default) profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let user_id: UserId = user_id.parse()?;
    let profile = run_blocking(&state.engine, move |engine| engine.profile(&user_id)).await?;
    Ok(Json(profile))
}

/// Top-N recommendations, `limit` defaults to 5
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendationsQuery>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let user_id: UserId = user_id.parse()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let items =
        run_blocking(&state.engine, move |engine| engine.recommend(&user_id, limit)).await?;
    Ok(Json(items))
}

/// Freshly assembled personalized feed
pub async fn get_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Feed>> {
    let user_id: UserId = user_id.parse()?;
    let feed = run_blocking(&state.engine, move |engine| engine.feed(&user_id)).await?;
    Ok(Json(feed))
}

/// Preference analysis report
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<AnalysisReport>> {
    let user_id: UserId = user_id.parse()?;
    let report = run_blocking(&state.engine, move |engine| engine.analyze(&user_id)).await?;
    Ok(Json(report))
}

/// Rate an item (1-5)
pub async fn rate(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<RateRequest>,
) -> AppResult<(StatusCode, Json<Interaction>)> {
    let user_id: UserId = user_id.parse()?;
    let profile = run_locked(&state, user_id, move |engine, user_id| {
        engine.rate(user_id, &request.item_id, request.rating)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(latest_interaction(profile)?)))
}

/// Record any interaction
pub async fn record_interaction(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<RecordInteractionRequest>,
) -> AppResult<(StatusCode, Json<Interaction>)> {
    let user_id: UserId = user_id.parse()?;
    let profile = run_locked(&state, user_id, move |engine, user_id| {
        engine.record_interaction(user_id, &request.item_id, request.action, request.rating)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(latest_interaction(profile)?)))
}

/// Add a preference value
pub async fn add_preference(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<AddPreferenceRequest>,
) -> AppResult<Json<Preferences>> {
    let user_id: UserId = user_id.parse()?;
    let profile = run_locked(&state, user_id, move |engine, user_id| {
        engine.add_preference(user_id, request.category, &request.value)
    })
    .await?;

    Ok(Json(profile.preferences))
}
