//! User account handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::permissions;
use scribe_shared::dto::{
    CreateUserRequest, ListQuery, RegisterUserRequest, UpdateMeRequest, UpdatePasswordRequest,
    UpdateUserRequest, UserResponse,
};
use scribe_shared::{MessageResponse, PaginatedResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppResult, validated};
use crate::state::AppState;

/// POST /users/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let user = state
        .services
        .users
        .register(req.email, req.password, req.full_name)
        .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /users/me
pub async fn read_me(current: CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(current.user)))
}

/// PUT /users/me
pub async fn update_me(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<UpdateMeRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let user = state
        .services
        .users
        .update_me(&current.actor, req.into())
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /users/me/password
pub async fn update_password(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<UpdatePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    state
        .services
        .users
        .change_password(&current.actor, &req.current_password, &req.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password updated successfully")))
}

/// DELETE /users/me
pub async fn delete_me(
    state: web::Data<AppState>,
    current: CurrentUser,
) -> AppResult<HttpResponse> {
    state
        .services
        .users
        .delete_user(&current.actor, current.actor.id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

/// GET /users
pub async fn list_users(
    state: web::Data<AppState>,
    current: CurrentUser,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = validated(query.into_inner())?;

    let page = state
        .services
        .users
        .list_users(&current.actor, query.page_request()?, query.filter())
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::<UserResponse>::from(page)))
}

/// POST /users
pub async fn create_user(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    permissions::require_superuser(&current.actor)?;
    let req = validated(body.into_inner())?;

    let user = state.services.users.create_user(req.into()).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state
        .services
        .users
        .get_user(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let user = state
        .services
        .users
        .update_user(&current.actor, path.into_inner(), req.into())
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .users
        .delete_user(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

/// POST /users/{id}/restore
pub async fn restore_user(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state
        .services
        .users
        .restore_user(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
