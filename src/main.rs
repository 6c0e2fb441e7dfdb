//! PayPal Payment Provider service
//!
//! Serves the provider's HTTP binding so a host that is not linked against
//! the crate can drive it.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /` - Provider identifier
//! - `POST /payments/*` - Payment session lifecycle
//! - `POST /account-holders/*` - Account holders
//! - `POST /payment-methods/*` - Vaulted payment methods
//! - `POST /webhooks/paypal` - PayPal webhook resolution

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use paypal_payment_provider::adapters::http::provider::{provider_router, ProviderAppState};
use paypal_payment_provider::adapters::paypal::PaypalPaymentAdapter;
use paypal_payment_provider::config::{AppConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    init_tracing(&config.server.log_level, config.server.log_format())?;
    tracing::info!("Starting PayPal payment provider");

    config.validate()?;
    tracing::info!(
        port = config.server.port,
        environment = ?config.server.environment,
        sandbox = config.paypal.sandbox,
        "Configuration loaded"
    );

    let adapter = PaypalPaymentAdapter::from_config(config.paypal.to_client_config());
    let state = ProviderAppState::new(Arc::new(adapter));

    let app = build_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormat) -> anyhow::Result<()> {
    // RUST_LOG wins over the configured level
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init()?,
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
    }

    Ok(())
}

fn build_router(state: ProviderAppState, request_timeout: Duration) -> Router {
    // Outermost first
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .merge(provider_router())
        .layer(middleware)
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
