use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{normalize_username, CatalogEntry, Profile, Rating, RatingEntry};
use crate::services::{
    GenreContribution, GenreWeight, RecommendOptions, Recommendations, Recommender,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub title: String,
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub title: String,
    pub rating: Rating,
    /// Rating the title had before this request, if any
    pub previous_rating: Option<Rating>,
    pub profile: Profile,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    pub top_n: Option<usize>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub ratings: Vec<RatingRequest>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationItem {
    pub title: String,
    pub score: f64,
    pub explanation: String,
    pub top_genres: Vec<GenreContribution>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub generated_at: DateTime<Utc>,
    pub preference: Vec<GenreWeight>,
    pub recommendations: Vec<RecommendationItem>,
}

impl From<Recommendations> for RecommendationResponse {
    fn from(result: Recommendations) -> Self {
        let recommendations = result
            .items
            .into_iter()
            .map(|item| RecommendationItem {
                explanation: item.explanation.to_string(),
                top_genres: item.explanation.contributions().to_vec(),
                title: item.title,
                score: item.score,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            preference: result.preference.ranked(),
            recommendations,
        }
    }
}

// Helpers

fn resolve_options(
    defaults: RecommendOptions,
    top_n: Option<usize>,
    top_k: Option<usize>,
) -> AppResult<RecommendOptions> {
    let options = RecommendOptions {
        top_n: top_n.unwrap_or(defaults.top_n),
        top_k: top_k.unwrap_or(defaults.top_k),
    };
    if options.top_n == 0 || options.top_k == 0 {
        return Err(AppError::InvalidInput(
            "top_n and top_k must be at least 1".to_string(),
        ));
    }
    Ok(options)
}

async fn load_existing(state: &AppState, username: &str) -> AppResult<Profile> {
    state
        .store
        .load(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {}", username)))
}

fn run_recommender(
    state: &AppState,
    ratings: &[RatingEntry],
    options: RecommendOptions,
) -> AppResult<RecommendationResponse> {
    let recommender = Recommender::with_options(&state.index, options);
    let result = recommender.recommend(ratings)?;
    Ok(RecommendationResponse::from(result))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List the catalog in catalog order
pub async fn get_catalog(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.entries().to_vec())
}

/// List the sorted genre universe
pub async fn get_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.index.universe().to_vec())
}

/// Create an empty profile
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    let username = normalize_username(&request.username)?;

    let _guard = state.lock_profile(&username).await;
    if state.store.load(&username).await?.is_some() {
        return Err(AppError::Conflict(format!("Profile {}", username)));
    }

    let profile = Profile::new(username);
    state.store.save(&profile).await?;

    tracing::info!(username = %profile.username, "Profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Get a stored profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Profile>> {
    let username = normalize_username(&username)?;
    Ok(Json(load_existing(&state, &username).await?))
}

/// Rate a title, or change an existing rating
pub async fn upsert_rating(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<RatingRequest>,
) -> AppResult<Json<RatingResponse>> {
    let username = normalize_username(&username)?;
    let rating = Rating::try_from(request.rating)?;
    let title = state
        .catalog
        .resolve(&request.title)
        .map(|entry| entry.title.clone())
        .ok_or_else(|| AppError::NotFound(format!("Title {}", request.title.trim())))?;

    let _guard = state.lock_profile(&username).await;
    let mut profile = load_existing(&state, &username).await?;

    let previous_rating = profile.change_rating(&title, rating);
    if previous_rating.is_none() {
        profile.add_rating(title.clone(), rating);
    }
    state.store.save(&profile).await?;

    tracing::info!(
        username = %username,
        title = %title,
        rating = %rating,
        previous = ?previous_rating.map(Rating::value),
        "Rating stored"
    );

    Ok(Json(RatingResponse {
        title,
        rating,
        previous_rating,
        profile,
    }))
}

/// Remove a title from a profile
pub async fn delete_rating(
    State(state): State<AppState>,
    Path((username, title)): Path<(String, String)>,
) -> AppResult<Json<Profile>> {
    let username = normalize_username(&username)?;

    let _guard = state.lock_profile(&username).await;
    let mut profile = load_existing(&state, &username).await?;

    // Profiles may hold titles that have since left the catalog, so fall back
    // to the raw path segment when resolution fails.
    let canonical = state
        .catalog
        .resolve(&title)
        .map(|entry| entry.title.clone())
        .unwrap_or(title);

    let removed = profile.remove_rating(&canonical).ok_or_else(|| {
        AppError::NotFound(format!("Rating for {} in profile {}", canonical, username))
    })?;
    state.store.save(&profile).await?;

    tracing::info!(username = %username, title = %removed.title, "Rating removed");
    Ok(Json(profile))
}

/// Recommend titles for a stored profile
pub async fn profile_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(username): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let username = normalize_username(&username)?;
    let options = resolve_options(state.options, query.top_n, query.top_k)?;
    let profile = load_existing(&state, &username).await?;

    tracing::info!(
        request_id = %request_id,
        username = %username,
        ratings = profile.ratings.len(),
        "Processing profile recommendation request"
    );

    let response = run_recommender(&state, &profile.ratings, options)?;
    Ok(Json(response))
}

/// Recommend titles for an ad hoc rating list
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let options = resolve_options(state.options, request.top_n, request.top_k)?;

    // Unknown titles pass through unchanged and are ignored by the engine.
    let ratings = request
        .ratings
        .into_iter()
        .map(|r| -> AppResult<RatingEntry> {
            let rating = Rating::try_from(r.rating)?;
            let title = state
                .catalog
                .resolve(&r.title)
                .map(|entry| entry.title.clone())
                .unwrap_or(r.title);
            Ok(RatingEntry::new(title, rating))
        })
        .collect::<AppResult<Vec<_>>>()?;

    tracing::info!(
        request_id = %request_id,
        ratings = ratings.len(),
        top_n = options.top_n,
        "Processing recommendation request"
    );

    let response = run_recommender(&state, &ratings, options)?;
    Ok(Json(response))
}
