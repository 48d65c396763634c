//! Account registration and token issuance.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Json, Router};
use tracing::info;

use tickler_api::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use tickler_db::queries::user;

use crate::auth::{create_token, hash_password, verify_password, AuthUser};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", post(register).get(current_user))
        .route("/token", post(token))
}

async fn current_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        username: user.username,
        email: user.email,
    })
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ServerResult<(StatusCode, Json<UserResponse>)> {
    let password_hash = hash_password(&req.password)?;
    let created = user::create_user(state.db.pool(), &req.username, &req.email, &password_hash)
        .await
        .map_err(|e| match e {
            tickler_db::DbError::AlreadyExists { .. } => ServerError::UsernameTaken,
            other => other.into(),
        })?;

    info!(username = %created.username, "registered user");
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            username: created.username,
            email: created.email,
        }),
    ))
}

/// Exchange credentials for a bearer token. Form-encoded, matching the
/// usual password-grant shape.
async fn token(
    State(state): State<AppState>,
    Form(req): Form<LoginRequest>,
) -> ServerResult<Json<TokenResponse>> {
    let found = user::get_user_by_username(state.db.pool(), &req.username)
        .await?
        .filter(|u| u.active)
        .ok_or(ServerError::Unauthorized)?;

    if !verify_password(&req.password, &found.password_hash)? {
        return Err(ServerError::Unauthorized);
    }

    let token = create_token(
        &state.jwt_encoding_key,
        found.id,
        state.config.token_expiry_minutes,
    )?;
    Ok(Json(TokenResponse::bearer(token)))
}
