//! User profile routes.
//!
//! Paths and bodies are parsed here; everything else is delegated to
//! `ProfileService`.

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use log::debug;
use profile_core::{NewProfile, ProfileId, ProfilePatch, ProfileRepository};

pub fn router<R>() -> Router<AppState<R>>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/api/users", get(list_users::<R>).post(create_user::<R>))
        .route(
            "/api/users/{id}",
            get(get_user::<R>)
                .put(update_user::<R>)
                .delete(delete_user::<R>),
        )
}

/// GET /api/users - list active users (listing projection).
async fn list_users<R>(State(state): State<AppState<R>>) -> ApiResult<Response>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let listing = state.service().list()?;
    Ok(
        ApiResponse::success("Users retrieved successfully", listing.items)
            .with_count(listing.count)
            .with_status(StatusCode::OK),
    )
}

/// GET /api/users/{id} - fetch one active user.
async fn get_user<R>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let profile = state
        .service()
        .get(id)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(ApiResponse::success("User retrieved successfully", profile).with_status(StatusCode::OK))
}

/// POST /api/users - create a user.
async fn create_user<R>(
    State(state): State<AppState<R>>,
    body: Result<Json<NewProfile>, JsonRejection>,
) -> ApiResult<Response>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let Json(input) = body.map_err(reject_body)?;
    let profile = state.service().create(input)?;
    Ok(ApiResponse::success("User created successfully", profile).with_status(StatusCode::CREATED))
}

/// PUT /api/users/{id} - partial update of name, email and age.
async fn update_user<R>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    body: Result<Json<ProfilePatch>, JsonRejection>,
) -> ApiResult<Response>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let Json(patch) = body.map_err(reject_body)?;
    let profile = state.service().update(id, &patch)?;
    Ok(ApiResponse::success("User updated successfully", profile).with_status(StatusCode::OK))
}

/// DELETE /api/users/{id} - soft delete.
async fn delete_user<R>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    if !state.service().delete(id)? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    Ok(ApiResponse::<()>::message("User deleted successfully").with_status(StatusCode::OK))
}

fn parse_id(raw: &str) -> ApiResult<ProfileId> {
    raw.trim()
        .parse::<ProfileId>()
        .map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    debug!(
        "event=http_body_rejected module=server status=error error={}",
        rejection.body_text()
    );
    ApiError::BadRequest("Invalid JSON body".to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("4.2").is_err());
        assert!(parse_id("").is_err());
    }
}
