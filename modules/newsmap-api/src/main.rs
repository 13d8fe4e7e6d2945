use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsmap_common::Config;
use newsmap_engine::{GameEngine, LocationDirectory};
use newsmap_headlines::{
    GoogleNewsProvider, HeadlineCache, HeadlineProvider, NewsDataProvider, ProviderChain,
};

mod rest;

pub struct AppState {
    pub engine: GameEngine,
    pub directory: Arc<LocationDirectory>,
    pub headlines: Arc<HeadlineCache>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsmap=info".parse()?))
        .init();

    let config = Config::from_env();

    // Load the static location dataset once; read-only afterwards.
    let directory = Arc::new(LocationDirectory::load(&config.locations_file)?);

    // Primary provider first, RSS fallback second.
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let providers: Vec<Box<dyn HeadlineProvider>> = vec![
        Box::new(NewsDataProvider::new(&config.newsdata_api_key, timeout)),
        Box::new(GoogleNewsProvider::new(timeout)),
    ];
    let headlines = Arc::new(HeadlineCache::new(
        ProviderChain::new(providers),
        Duration::from_secs(config.cache_ttl_minutes * 60),
    ));

    let engine = GameEngine::new(
        directory.clone(),
        headlines.clone(),
        config.round_count,
        Duration::from_secs(config.session_ttl_minutes * 60),
    );

    let state = Arc::new(AppState {
        engine,
        directory,
        headlines,
    });

    let app = Router::new()
        .route("/api/health", get(rest::api_health))
        .route("/api/locations", get(rest::api_locations))
        .route("/api/news/{location_id}", get(rest::api_news))
        .route("/api/game/start", post(rest::api_game_start))
        .route("/api/game/{id}/guess", post(rest::api_game_guess))
        .route("/api/game/{id}/next", post(rest::api_game_next))
        .route("/api/game/{id}/results", get(rest::api_game_results))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("NewsMap API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
