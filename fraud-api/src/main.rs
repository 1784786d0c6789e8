//! Credit Card Fraud Detection API
//!
//! Serves predictions from the artifacts written by `fraud-train`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FRAUD API                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌────────────────────┐  │
//! │  │  Router   │──▶│  Predictor   │──▶│ scaler → forest    │  │
//! │  │  (Axum)   │   │  (Arc, r/o)  │   │ (fraud-core)       │  │
//! │  └───────────┘   └──────┬───────┘   └────────────────────┘  │
//! │                         ▲ loaded once at startup            │
//! │                ┌────────┴────────┐                          │
//! │                │ scaler.json     │                          │
//! │                │ model.json      │                          │
//! │                │ config.json     │                          │
//! │                └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;

#[cfg(test)]
mod tests;

use std::any::Any as PanicPayload;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use fraud_core::{load_artifacts, Predictor};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("Fraud Detection API starting ({})...", config.environment);

    let state = AppState {
        config: config.clone(),
        model: load_model(&config.model_dir),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fraud_api=debug,fraud_core=info,tower_http=debug".into());

    // JSON lines in production, human-readable otherwise
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Load the artifacts, or `None` so the service starts degraded
fn load_model(dir: &Path) -> Option<Arc<Predictor>> {
    match load_artifacts(dir) {
        Ok(predictor) => Some(Arc::new(predictor)),
        Err(e) if e.is_not_found() => {
            tracing::error!("No trained model in {}: {}", dir.display(), e);
            tracing::warn!("Serving without a model; run fraud-train and restart");
            None
        }
        Err(e) => {
            tracing::error!("Error loading model from {}: {}", dir.display(), e);
            None
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    /// `None` when the artifacts failed to load
    pub model: Option<Arc<Predictor>>,
}

impl AppState {
    pub fn model(&self) -> AppResult<&Predictor> {
        self.model.as_deref().ok_or(AppError::ModelUnavailable)
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::status))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/predict_demo", get(handlers::predict::predict_demo))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Turn a handler panic into the `internal` error body
fn handle_panic(err: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
