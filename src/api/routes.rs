use super::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/extract", post(handlers::extract))
        .route("/api/status/:job_id", get(handlers::job_status))
        .route("/api/download/:job_id", get(handlers::download))
        .route("/api/jobs", get(handlers::list_jobs))
        .route("/api/healthcheck", get(handlers::healthcheck))
        .with_state(state)
}
