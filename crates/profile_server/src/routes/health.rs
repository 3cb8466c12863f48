//! Health check.

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use profile_core::ProfileRepository;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub fn router<R>() -> Router<AppState<R>>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    Router::new().route("/api/health", get(health::<R>))
}

/// GET /api/health - liveness plus a store round-trip.
async fn health<R>(State(state): State<AppState<R>>) -> ApiResult<Response>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    state.service().count()?;
    Ok(ApiResponse::success(
        "Server is running",
        Health {
            status: "ok",
            version: profile_core::core_version(),
        },
    )
    .with_status(StatusCode::OK))
}
