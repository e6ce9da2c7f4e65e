use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{
    LoginRequest, LoginResponse, MessageResponse, ResendRequest, SignupRequest, SignupResponse,
    VerifyCodeRequest, VerifyResponse,
};
use crate::auth::{services, verification};
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/verify-code", post(verify_code))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/login", post(login))
        .route("/auth/verify/:token", get(verify_legacy))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let outcome = services::register(&state, payload).await?;
    let message = if outcome.email_sent {
        "Signup successful! Check your email for verification code."
    } else {
        "Signup complete but email could not be sent. Please resend."
    };
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: message.into(),
            email_sent: outcome.email_sent,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn verify_code(
    State(state): State<AppState>,
    Json(payload): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    if payload.email.trim().is_empty() || payload.code.trim().is_empty() {
        return Err(ApiError::Validation("Email and code are required".into()));
    }
    let account = state
        .store
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::NotFound)?;
    verification::verify_code(state.store.as_ref(), &account, &payload.code).await?;
    Ok(Json(VerifyResponse {
        message: "Email verified successfully".into(),
        verified: true,
    }))
}

#[instrument(skip(state, payload))]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<ResendRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let sent = services::resend(&state, &payload.email).await?;
    let message = if sent {
        "Verification code resent successfully"
    } else {
        "Verification code reissued but the email could not be sent. Please try again."
    };
    Ok(Json(MessageResponse {
        message: message.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, user) = services::authenticate(&state, &payload.email, &payload.password).await?;
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
        user,
    }))
}

/// Old link-based verification route; sends the browser to the frontend
/// page explaining the code flow.
#[instrument(skip(state))]
pub async fn verify_legacy(
    State(state): State<AppState>,
    Path(_token): Path<String>,
) -> Redirect {
    let target = format!(
        "{}/verify-expired?message=Please use the verification code sent to your email",
        state.config.frontend_url
    );
    Redirect::temporary(&target)
}
