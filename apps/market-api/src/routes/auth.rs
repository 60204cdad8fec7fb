//! Email/password authentication and the OTP signup flow.
//!
//! ## Contract Notes
//! Login failures (unknown email, wrong password) return HTTP 200 with
//! `{"success": false, ...}` rather than an error status. Client apps key
//! off the `success` flag here; do not "fix" this to 401 without
//! coordinating a client release.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use market_core::validation::{validate_email, validate_otp_code};
use market_core::{OtpRecord, User};

use crate::error::ApiError;
use crate::mailer::MailerError;
use crate::{auth, AppState};

/// Attempts at finding a free generated user id before giving up.
const MAX_ID_ATTEMPTS: usize = 20;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/email/login", post(login))
        .route("/email/signup", post(signup))
        .route("/email/signup/sendotp", post(send_otp))
        .route("/email/verifyotp", post(verify_otp))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    pwd: String,
}

/// `POST /auth/email/login`
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(user) = state.db.users().get_by_email(&req.email).await? else {
        return Ok(Json(json!({
            "success": false,
            "message": "User not found",
        })));
    };

    state.db.users().touch_last_accessed(&user.id).await?;

    if !auth::verify_password(&req.pwd, &user.password_hash) {
        return Ok(Json(json!({
            "success": false,
            "message": "Password does not match",
        })));
    }

    let token = state.jwt.generate_token(&user.id, &user.name, &user.email)?;

    info!(id = %user.id, "Login");
    Ok(Json(json!({
        "success": true,
        "token": token,
        "session_details": {
            "id": user.id,
            "username": user.name,
            "email": user.email,
        },
    })))
}

#[derive(Debug, Deserialize)]
struct SendOtpRequest {
    email: String,
}

/// `POST /auth/email/signup/sendotp`
async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_email(&req.email)?;

    let email = req.email.trim().to_string();
    let record = OtpRecord {
        email: email.clone(),
        code: auth::generate_otp_code(),
        expires_at: Utc::now() + Duration::seconds(state.config.otp_ttl_secs),
    };

    state.db.otp().upsert(&record).await?;

    state
        .mailer
        .send_otp(&email, &record.code, state.config.otp_ttl_secs)
        .map_err(|MailerError(reason)| ApiError::Internal(reason))?;

    Ok(Json(json!({
        "success": true,
        "message": "OTP sent to email",
    })))
}

#[derive(Debug, Deserialize)]
struct VerifyOtpRequest {
    email: String,
    otp: String,
}

/// `POST /auth/email/verifyotp`
///
/// Checks the pending code without consuming it; only signup consumes.
/// An expired code is deleted as soon as it is detected.
async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_otp(&state, &req.email, &req.otp).await?;

    Ok(Json(json!({
        "success": true,
        "message": "OTP verified",
    })))
}

/// Shared OTP check used by verifyotp and signup.
async fn check_otp(state: &AppState, email: &str, otp: &str) -> Result<(), ApiError> {
    validate_otp_code(otp)?;

    let record = state
        .db
        .otp()
        .get(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No OTP pending for this email".to_string()))?;

    if record.is_expired_at(Utc::now()) {
        state.db.otp().delete(email).await?;
        return Err(ApiError::Validation("OTP expired".to_string()));
    }

    if record.code != otp {
        return Err(ApiError::Validation("Invalid OTP".to_string()));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct SignupRequest {
    email: String,
    username: String,
    pwd: String,
    otp: String,
}

/// `POST /auth/email/signup`
///
/// Verifies the OTP, creates the account under a generated id, consumes
/// the OTP, and returns a session token.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_email(&req.email)?;
    let email = req.email.trim().to_string();

    check_otp(&state, &email, &req.otp).await?;

    if state.db.users().get_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let users = state.db.users();
    let mut user_id = None;
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = auth::user_id_candidate(&req.username);
        if !users.id_exists(&candidate).await? {
            user_id = Some(candidate);
            break;
        }
    }
    let Some(user_id) = user_id else {
        warn!(username = %req.username, "Could not find a free user id");
        return Err(ApiError::Internal(
            "Could not allocate a user id".to_string(),
        ));
    };

    let user = User {
        id: user_id,
        name: req.username,
        password_hash: auth::hash_password(&req.pwd)?,
        email,
        // Location and coordinates arrive later through /user/updateuser
        location: String::new(),
        latitude: String::new(),
        longitude: String::new(),
        created_at: Utc::now(),
        phone: String::new(),
        profile_pic: String::new(),
        last_accessed: None,
    };

    users.insert(&user).await?;
    state.db.otp().delete(&user.email).await?;

    let token = state.jwt.generate_token(&user.id, &user.name, &user.email)?;

    info!(id = %user.id, "Signup complete");
    Ok(Json(json!({
        "success": true,
        "token": token,
        "session_details": {
            "id": user.id,
            "username": user.name,
            "email": user.email,
        },
    })))
}
