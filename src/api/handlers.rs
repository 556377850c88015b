use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::RecommendedMovie,
    services::recommendations,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub data_loaded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoviesResponse {
    pub movies: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(alias = "movie_name")]
    pub movie_name: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub movie: String,
    pub recommendations: Vec<RecommendedMovie>,
}

// Handlers

/// Root endpoint
pub async fn root() -> Json<MessageResponse> {
    MessageResponse::new("Movie Recommender API is running!")
}

/// Health check endpoint, reporting whether a dataset is loaded
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let data_loaded = state.store.is_loaded().await;
    let status = if data_loaded { "healthy" } else { "unhealthy" };

    Json(HealthResponse {
        status: status.to_string(),
        data_loaded,
    })
}

/// Get all movie titles in dataset order
pub async fn get_movies(State(state): State<AppState>) -> AppResult<Json<MoviesResponse>> {
    let movies = state.store.list_titles().await?;
    Ok(Json(MoviesResponse { movies }))
}

/// Search movie titles by case-insensitive substring
pub async fn search_movies(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> AppResult<Json<MoviesResponse>> {
    let movies = state.store.search_titles(&query).await?;

    tracing::debug!(query = %query, matches = movies.len(), "Searched movie titles");

    Ok(Json(MoviesResponse { movies }))
}

/// Recommend movies similar to the requested one
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let Json(request) = payload?;

    tracing::info!(
        request_id = %request_id,
        movie = %request.movie_name,
        "Processing recommendation request"
    );

    let snapshot = state.store.current().await?;
    let recommendations = recommendations::recommend(&snapshot, &request.movie_name)?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        version = snapshot.version(),
        "Recommendations generated"
    );

    Ok(Json(RecommendResponse {
        movie: request.movie_name,
        recommendations,
    }))
}

/// Reload the dataset from the configured source
pub async fn reload_data(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<MessageResponse>> {
    tracing::info!(
        request_id = %request_id,
        source = %state.store.source_description(),
        "Reloading dataset"
    );

    let snapshot = state.store.load().await?;

    Ok(MessageResponse::new(format!(
        "Data reloaded successfully ({} movies, version {})",
        snapshot.len(),
        snapshot.version()
    )))
}
