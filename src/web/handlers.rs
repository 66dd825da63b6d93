//! HTTP request handlers.

use super::AppState;
use crate::targets::load_targets;

use axum::{
    extract::State,
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;

// ============================================================================
// Templates
// ============================================================================

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Set on `/status` responses when some targets have no record, either
/// because the batch deadline expired or because their check failed.
pub const MISSING_HEADER: &str = "x-sitewatch-missing";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Page
// ============================================================================

pub async fn handle_index() -> impl IntoResponse {
    Html(INDEX_TEMPLATE.replace("{{title}}", "System Status"))
}

// ============================================================================
// API: Status
// ============================================================================

/// Run a batch over the configured URL list and return every record.
pub async fn handle_status(State(state): State<AppState>) -> Response {
    let targets = load_targets(&state.config.urls_path).await;

    let report = match state.runner.run(targets).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Status batch failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e);
        }
    };

    if !report.is_complete() {
        let missing: Vec<&str> = report.missing.iter().map(|m| m.target.as_str()).collect();
        tracing::warn!(
            "Returning partial status: {} of {} targets missing: {:?}",
            report.missing.len(),
            report.missing.len() + report.results.len(),
            missing
        );
    } else if state.config.persist_snapshot {
        if let Err(e) = state.snapshots.save(&report.results).await {
            tracing::error!(
                "Failed to write snapshot {}: {}",
                state.snapshots.path().display(),
                e
            );
        }
    }

    let mut response = Json(&report.results).into_response();
    if !report.is_complete() {
        response.headers_mut().insert(
            HeaderName::from_static(MISSING_HEADER),
            HeaderValue::from(report.missing.len()),
        );
    }
    response
}

/// Return the last persisted snapshot.
pub async fn handle_snapshot(State(state): State<AppState>) -> Response {
    match state.snapshots.load().await {
        Ok(results) => Json(results).into_response(),
        Err(e) => {
            tracing::error!("Failed to read snapshot: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

// ============================================================================
// Static Assets
// ============================================================================

pub async fn handle_favicon() -> impl IntoResponse {
    // Return a simple SVG favicon
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <circle cx="50" cy="50" r="45" fill="#274c77"/>
        <path d="M28 52 L44 68 L74 34" stroke="white" stroke-width="8" fill="none"/>
    </svg>"##;

    (
        [(axum::http::header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
}
