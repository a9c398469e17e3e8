//! Authentication handlers.

use actix_web::{HttpResponse, web};

use scribe_shared::dto::{AuthResponse, LoginRequest, UserResponse};

use crate::middleware::auth::{CurrentUser, roles_for};
use crate::middleware::error::{AppResult, validated};
use crate::state::AppState;

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let user = state
        .services
        .users
        .authenticate(&req.email, &req.password)
        .await?;

    let token = state
        .tokens
        .generate_token(user.id, &user.email, roles_for(&user))?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        state.tokens.expiration_seconds().max(0) as u64,
    )))
}

/// POST /login/test-token
pub async fn test_token(current: CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(current.user)))
}
