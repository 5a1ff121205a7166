//! Users REST resource
//!
//! GET    /users            list every user, or one user with `?userId=`
//! GET    /users/:user_id   fetch one user (`userId: null` when missing)
//! POST   /users            create a user, returning the stored record
//! DELETE /users/:user_id   delete a user, returning its id

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::db::User;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Query parameters accepted by `GET /users`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLookup {
    pub user_id: Option<String>,
}

/// GET /users
///
/// A non-empty `userId` query parameter narrows the listing to that user,
/// answered like `GET /users/:user_id`.
pub async fn list_users(
    State(state): State<AppState>,
    Query(lookup): Query<UserLookup>,
) -> Result<Response, ApiError> {
    match lookup.user_id.filter(|id| !id.is_empty()) {
        Some(user_id) => {
            let user = state.users.get(&user_id).await?;
            Ok(Json(user).into_response())
        }
        None => {
            let users = state.users.find_all().await?;
            Ok(Json(users).into_response())
        }
    }
}

/// GET /users/:user_id
///
/// A miss is answered with the empty user, not a 404.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state.users.get(&user_id).await?;

    if !user.is_found() {
        tracing::debug!(user_id = %user_id, "User not found");
    }

    Ok(Json(user))
}

/// POST /users
///
/// Any `userId` in the body is replaced by a freshly generated one.
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<User>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(user) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let created = state.users.create(user).await?;
    Ok(Json(created))
}

/// DELETE /users/:user_id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<String>, ApiError> {
    let deleted = state.users.delete(&user_id).await?;

    tracing::info!(user_id = %deleted, "Deleted user");
    Ok(Json(deleted))
}
