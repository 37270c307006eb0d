mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::error::Result;
use axum::{http::Method, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

/// The full HTTP application: routes, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    routes::create_routes(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(
        "Serving the iframe extractor API on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
