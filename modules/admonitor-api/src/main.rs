use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use admonitor_core::{build_classifier, Config, Pipeline, PlatformFilter, ScanSearch};
use urlscan_client::UrlscanClient;

mod rest;

pub struct AppState {
    pub pipeline: Pipeline,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("admonitor_api=info".parse()?)
                .add_directive("admonitor_core=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let search: Arc<dyn ScanSearch> =
        Arc::new(UrlscanClient::new(config.urlscan_api_key.as_deref()));
    let classifier = build_classifier(&config, search.clone());
    let platforms = PlatformFilter::new(&config.extra_platform_suffixes);

    let state = Arc::new(AppState {
        pipeline: Pipeline::new(search, classifier, platforms),
    });

    let app = Router::new()
        .route("/", get(rest::home))
        .route("/buscar", get(rest::buscar))
        .route("/checar", post(rest::checar))
        .with_state(state)
        // Dashboard is served cross-origin
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
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

    let addr = format!("{}:{}", config.host, config.port);
    info!(classifier = ?config.classifier, "Ad monitor API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
