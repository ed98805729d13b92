use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tw_market_sentiment::aggregator::{AggregationPolicy, ForumAggregator};
use tw_market_sentiment::classifier::SentimentClassifier;
use tw_market_sentiment::config::Config;
use tw_market_sentiment::fear_greed::FearGreedRetriever;
use tw_market_sentiment::fetcher::PageFetcher;
use tw_market_sentiment::llm::Llm;
use tw_market_sentiment::podcast::EpisodeResolver;
use tw_market_sentiment::web::{self, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting tw-market-sentiment");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        board = %config.ptt_board,
        max_pages = config.max_pages,
        max_posts_per_page = config.max_posts_per_page,
        "Configuration loaded"
    );

    let llm = Llm::from_config(&config).context("Failed to initialize language model")?;
    if llm.is_available() {
        info!(model = %config.gemini_model, "Language model enabled");
    } else {
        warn!("GEMINI_API_KEY not set - forum posts will be classified by keywords only");
    }

    let fetcher = PageFetcher::new(config.http_timeout).context("Failed to build page fetcher")?;
    let classifier = SentimentClassifier::new(llm.clone(), config.podcast_name.clone());
    let aggregator = ForumAggregator::new(
        fetcher,
        classifier.clone(),
        AggregationPolicy::from(&config),
        config.board_index_url(),
    );
    let episodes = EpisodeResolver::new(&config).context("Failed to build episode resolver")?;
    let fear_greed =
        FearGreedRetriever::new(&config, llm).context("Failed to build Fear & Greed retriever")?;

    let state = AppState::new(config, aggregator, classifier, episodes, fear_greed);

    let web_handle = tokio::spawn(async move {
        if let Err(e) = web::serve(state).await {
            error!("Web server error: {e:#}");
        }
    });

    shutdown_signal().await;

    info!("Shutting down...");
    web_handle.abort();
    info!("Shutdown complete");

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tw_market_sentiment=debug"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
