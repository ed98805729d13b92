use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::pages;
use super::AppState;
use crate::aggregator::AnalyzeUrlError;
use crate::constants::MAX_AUDIO_BYTES;
use crate::models::Episode;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/ptt", get(ptt_page))
        .route("/analyze", get(analyze_page))
        .route("/podcast/:episode_number", get(podcast_page))
        .route("/healthz", get(health))
        .route("/api/analyze-url", post(api_analyze_url))
        .route("/api/ptt-sentiment", get(api_ptt_sentiment))
        .route("/api/episodes", get(api_episodes))
        .route("/api/podcast/:episode_number", get(api_podcast))
        .route(
            "/api/podcast/audio",
            post(api_podcast_audio).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .route("/api/fear-greed", get(api_fear_greed))
}

// ========== JSON envelope ==========

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn api_ok<T: Serialize>(data: T) -> Response {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
    .into_response()
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }),
    )
        .into_response()
}

// ========== HTML Routes ==========

async fn home(State(state): State<AppState>) -> Response {
    let index = state.fear_greed_index().await;
    let episodes = state.episodes.resolve_episodes().await;
    Html(pages::render_home_page(index.as_ref(), &episodes).into_string()).into_response()
}

async fn ptt_page(State(state): State<AppState>) -> Response {
    match state.aggregator.run().await {
        Ok(posts) => Html(pages::render_ptt_page(&posts).into_string()).into_response(),
        Err(e) => {
            tracing::error!("Forum aggregation failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Html(pages::render_ptt_error_page().into_string()),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    url: Option<String>,
}

async fn analyze_page(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
) -> Response {
    let url = params.url.unwrap_or_default();
    let url = url.trim();

    let result = if url.is_empty() {
        None
    } else {
        Some(state.aggregator.analyze_url(url).await)
    };

    Html(pages::render_analyze_page(url, result.as_ref()).into_string()).into_response()
}

async fn podcast_page(
    State(state): State<AppState>,
    Path(episode_number): Path<String>,
) -> Response {
    let Some(episode) = find_episode(&state, &episode_number).await else {
        return (
            StatusCode::NOT_FOUND,
            Html(pages::render_episode_not_found_page(&episode_number).into_string()),
        )
            .into_response();
    };

    let report = state.classifier.analyze_episode(&episode).await;
    Html(pages::render_podcast_page(&episode, &report).into_string()).into_response()
}

async fn health() -> &'static str {
    "ok"
}

// ========== JSON API Routes ==========

#[derive(Debug, Deserialize)]
pub struct AnalyzeUrlRequest {
    #[serde(default)]
    url: String,
}

async fn api_analyze_url(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeUrlRequest>, JsonRejection>,
) -> Response {
    let url = match payload {
        Ok(Json(request)) => request.url,
        Err(rejection) => {
            tracing::debug!("Rejected analyze-url body: {rejection}");
            return api_error(StatusCode::BAD_REQUEST, "Invalid URL");
        }
    };

    match state.aggregator.analyze_url(url.trim()).await {
        Ok(article) => api_ok(article),
        Err(AnalyzeUrlError::InvalidUrl(url)) => {
            tracing::debug!(url = %url, "Rejected non-forum URL");
            api_error(StatusCode::BAD_REQUEST, "Invalid URL")
        }
        Err(AnalyzeUrlError::FetchFailed(url)) => {
            tracing::warn!(url = %url, "Article fetch failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch page")
        }
    }
}

async fn api_ptt_sentiment(State(state): State<AppState>) -> Response {
    match state.aggregator.run().await {
        Ok(posts) => api_ok(posts),
        Err(e) => {
            tracing::error!("Forum aggregation failed: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch PTT data")
        }
    }
}

async fn api_episodes(State(state): State<AppState>) -> Response {
    api_ok(state.episodes.resolve_episodes().await)
}

async fn api_podcast(
    State(state): State<AppState>,
    Path(episode_number): Path<String>,
) -> Response {
    match find_episode(&state, &episode_number).await {
        Some(episode) => api_ok(state.classifier.analyze_episode(&episode).await),
        None => api_error(StatusCode::NOT_FOUND, "Episode not found"),
    }
}

async fn api_podcast_audio(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_lowercase())
        .unwrap_or_default();

    if !mime_type.starts_with("audio/") || body.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Invalid audio upload");
    }

    tracing::info!(mime_type = %mime_type, bytes = body.len(), "Analyzing uploaded audio");
    api_ok(state.classifier.analyze_audio(&mime_type, body.to_vec()).await)
}

async fn api_fear_greed(State(state): State<AppState>) -> Response {
    match state.fear_greed_index().await {
        Some(index) => api_ok(index),
        None => api_error(StatusCode::BAD_GATEWAY, "Failed to fetch Fear & Greed index"),
    }
}

async fn find_episode(state: &AppState, episode_number: &str) -> Option<Episode> {
    state
        .episodes
        .resolve_episodes()
        .await
        .into_iter()
        .find(|e| e.episode_number == episode_number || e.id == episode_number)
}
