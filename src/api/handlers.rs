use super::{ApiError, ApiResult, AppState};
use crate::domain::{JobStatus, ScrapeParams};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

pub async fn extract(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let request: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::InvalidRequest("Invalid JSON data".to_string()))?;
    if !request.is_object() {
        return Err(ApiError::InvalidRequest("Invalid JSON data".to_string()));
    }

    let params = params_from_request(&request);
    info!("Received extraction request: {:?}", params);

    let job = state.jobs.submit(params)?;

    Ok(Json(json!({
        "status": "success",
        "message": "Extraction job submitted successfully",
        "job_id": job.id,
    })))
}

pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_job_id(&job_id)?;
    let job = state
        .jobs
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    Ok(Json(json!({
        "status": "success",
        "job": job,
    })))
}

pub async fn download(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_job_id(&job_id)?;
    let job = state
        .jobs
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::InvalidRequest("Job is not completed yet".to_string()));
    }

    let report = state
        .jobs
        .report(&id)?
        .ok_or_else(|| ApiError::NotFound("Result file not found".to_string()))?;
    let body = report.to_json().map_err(crate::error::ScrapeError::from)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"iframe_results_{}.json\"", id),
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let jobs = state.jobs.list()?;

    Ok(Json(json!({
        "status": "success",
        "jobs": jobs,
    })))
}

pub async fn healthcheck() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Service is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Local::now().to_rfc3339(),
    }))
}

/// Unknown and malformed ids are indistinguishable to the client.
fn parse_job_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Job not found".to_string()))
}

/// Missing or unusable values fall back to the defaults instead of
/// rejecting the request.
fn params_from_request(request: &Value) -> ScrapeParams {
    let defaults = ScrapeParams::default();
    let max_items = request.get("max_items").or_else(|| request.get("max_games"));

    ScrapeParams::new(
        lenient_count(max_items).unwrap_or(defaults.max_items),
        lenient_count(request.get("offset")).unwrap_or(defaults.start_offset),
        lenient_seconds(request.get("delay")).unwrap_or(defaults.delay_seconds),
    )
}

fn lenient_count(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .map(|n| n as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}

fn lenient_seconds(value: Option<&Value>) -> Option<f64> {
    let seconds = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}
