//! HookRelay listener entry point.
//!
//! This binary is the composition root for the whole system:
//!
//! 1. **Wire observability** — `tracing-subscriber` with an env-filter and
//!    JSON output; every span and structured event emitted by the
//!    workspace crates flows through this layer.
//! 2. **Load configuration** — webhook secret, optional downstream
//!    endpoint, bind port; all from the environment, validated before the
//!    server starts.
//! 3. **Construct infrastructure** — the GitHub webhook handler and the
//!    sink stack (console always; HTTP sink when an endpoint is
//!    configured), composed behind one composite publisher.
//! 4. **Serve** — axum router with a health check and the GitHub webhook
//!    route. Each request is handled independently end-to-end; the
//!    pipeline holds no cross-request state.

mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;
use tracing_subscriber::EnvFilter;

use github::WebhookHandler;
use publisher::{CompositePublisher, ConsolePublisher, EventPublisher, HttpPublisher};

use crate::config::ListenerConfig;
use crate::routes::AppState;

/// Assembles the sink stack from the configuration.
fn build_publisher(config: &ListenerConfig) -> Arc<dyn EventPublisher> {
    let mut composite = CompositePublisher::default();
    composite.push(Box::new(ConsolePublisher));

    if let Some(endpoint) = &config.event_endpoint {
        let mut sink = HttpPublisher::new(endpoint.clone());
        if let Some(token) = &config.event_endpoint_token {
            sink = sink.with_bearer_token(token.clone());
        }
        composite.push(Box::new(sink));
        info!(endpoint = %endpoint, "HTTP event sink configured");
    }

    Arc::new(composite)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ListenerConfig::from_env().context("invalid listener configuration")?;

    let state = AppState {
        handler: Arc::new(WebhookHandler::new(config.webhook_secret.as_bytes())),
        publisher: build_publisher(&config),
    };

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/webhooks/github", post(routes::github_webhook))
        .with_state(state);

    let bind_addr = ("0.0.0.0", config.port);
    let tcp = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!(port = config.port, "listener started");

    axum::serve(tcp, app).await.context("server error")?;
    Ok(())
}
