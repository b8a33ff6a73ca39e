//! Auth endpoints and request-identity middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// Header naming the acting user; absent means the default demo user.
const USER_ID_HEADER: &str = "x-user-id";

/// Requesting user stored in request extensions
#[derive(Clone, Debug)]
pub struct RequestUser {
    pub user_id: String,
}

/// Identity middleware - resolves the acting user from the X-User-Id header,
/// falling back to the bootstrapped default user, and verifies the row exists.
pub async fn user_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| state.default_user_id.clone());

    let user = state
        .db
        .get_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    request.extensions_mut().insert(RequestUser { user_id: user.id });

    Ok(next.run(request).await)
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    if state.db.get_user(&payload.user_id).await?.is_some() {
        return Err(ApiError::BadRequest("User ID already in use".to_string()));
    }
    if state.db.get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

    let user = state
        .db
        .create_user(
            &payload.user_id,
            &payload.email,
            &password_hash,
            payload.gender.as_deref(),
            payload.name.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            id: user.id,
            email: user.email,
            gender: user.gender,
            name: user.name,
            created_at: user.created_at,
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Verifies email/password and returns basic user info; token issuance is a
/// later concern.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state
        .db
        .get_user(&payload.user_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    let verified = bcrypt::verify(&payload.password, &user.password_hash).unwrap_or(false);
    if !verified {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        name: user.name,
    }))
}
