//! User CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use market_core::validation::{validate_email, validate_id};
use market_core::{CoreError, GeoPoint, User};
use market_db::{DbError, UserPatch};

use crate::error::ApiError;
use crate::{auth, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/createuser", put(create_user))
        .route("/updateuser", patch(update_user))
        .route("/getuser/{id}", get(get_user))
        .route("/deleteuser/{id}", delete(delete_user))
}

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    id: String,
    name: String,
    /// Plain-text password; hashed before storage.
    pwd: String,
    email: String,
    location: String,
    latitude: String,
    longitude: String,
    phone: String,
    #[serde(default)]
    profile_pic: String,
}

/// `PUT /user/createuser`
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_id("id", &req.id)?;
    validate_email(&req.email)?;
    // Coordinates must parse now so browsing never trips over them later
    GeoPoint::parse(&req.latitude, &req.longitude)?;

    let user = User {
        id: req.id.trim().to_string(),
        name: req.name,
        password_hash: auth::hash_password(&req.pwd)?,
        email: req.email.trim().to_string(),
        location: req.location,
        latitude: req.latitude,
        longitude: req.longitude,
        created_at: Utc::now(),
        phone: req.phone,
        profile_pic: req.profile_pic,
        last_accessed: None,
    };

    state.db.users().insert(&user).await.map_err(|e| match e {
        DbError::UniqueViolation { .. } => ApiError::Conflict("User already exists".to_string()),
        other => other.into(),
    })?;

    info!(id = %user.id, "User created");
    Ok(Json(json!({
        "message": "User created successfully",
        "user": user,
    })))
}

#[derive(Debug, Deserialize)]
struct UpdateUserRequest {
    user_id: String,
    #[serde(flatten)]
    patch: UserPatch,
}

/// `PATCH /user/updateuser` - partial update; only supplied fields change.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_id("user_id", &req.user_id)?;

    if req.patch.is_empty() {
        return Err(CoreError::EmptyUpdate.into());
    }
    if let Some(email) = &req.patch.email {
        validate_email(email)?;
    }

    let user = state.db.users().update(&req.user_id, &req.patch).await?;

    Ok(Json(json!({
        "message": "User updated successfully",
        "user": user,
    })))
}

/// `GET /user/getuser/{id}`
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(id.clone()))?;

    Ok(Json(json!({ "user": user })))
}

/// `DELETE /user/deleteuser/{id}`
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.users().delete(&id).await?;

    info!(id = %id, "User deleted");
    Ok(Json(json!({
        "message": "User deleted successfully",
        "user_id": id,
    })))
}
