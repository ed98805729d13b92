pub mod pages;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::aggregator::ForumAggregator;
use crate::classifier::SentimentClassifier;
use crate::config::Config;
use crate::fear_greed::{mock_index, FearGreedRetriever};
use crate::models::FearAndGreedIndex;
use crate::podcast::EpisodeResolver;

/// Shared application state.
///
/// Everything in here is read-only after startup; handlers clone what they
/// need and run each pipeline as one sequential task.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: ForumAggregator,
    pub classifier: SentimentClassifier,
    pub episodes: EpisodeResolver,
    pub fear_greed: FearGreedRetriever,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: Config,
        aggregator: ForumAggregator,
        classifier: SentimentClassifier,
        episodes: EpisodeResolver,
        fear_greed: FearGreedRetriever,
    ) -> Self {
        Self {
            config: Arc::new(config),
            aggregator,
            classifier,
            episodes,
            fear_greed,
        }
    }

    /// Current index, with the neutral placeholder substituted when every
    /// source failed and the substitution is enabled.
    pub async fn fear_greed_index(&self) -> Option<FearAndGreedIndex> {
        match self.fear_greed.fetch_index().await {
            Some(index) => Some(index),
            None if self.config.fear_greed_mock_fallback => Some(mock_index()),
            None => None,
        }
    }
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.web_host, state.config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
