//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_shared::dto::{
    CommentResponse, CreatePostRequest, ListQuery, PostDetailResponse, PostResponse,
    UpdatePostRequest,
};
use scribe_shared::{MessageResponse, PaginatedResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppResult, validated};
use crate::state::AppState;

/// GET /posts
pub async fn list_posts(
    state: web::Data<AppState>,
    current: CurrentUser,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = validated(query.into_inner())?;

    let page = state
        .services
        .posts
        .list_posts(&current.actor, query.page_request()?, query.filter())
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::<PostResponse>::from(page)))
}

/// GET /posts/author/{author_id}
pub async fn list_by_author(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = validated(query.into_inner())?;

    let page = state
        .services
        .posts
        .list_by_author(
            &current.actor,
            path.into_inner(),
            query.page_request()?,
            query.filter(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::<PostResponse>::from(page)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let detail = state
        .services
        .posts
        .create_post(&current.actor, req.into())
        .await?;

    Ok(HttpResponse::Created().json(PostDetailResponse::from(detail)))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    _current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state
        .services
        .posts
        .get_post_detail(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse::from(detail)))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let detail = state
        .services
        .posts
        .update_post(&current.actor, path.into_inner(), req.into())
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse::from(detail)))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .posts
        .delete_post(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// POST /posts/{id}/restore
pub async fn restore_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .services
        .posts
        .restore_post(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// GET /posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = validated(query.into_inner())?;

    let page = state
        .services
        .comments
        .list_by_post(
            &current.actor,
            path.into_inner(),
            query.page_request()?,
            query.filter(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::<CommentResponse>::from(page)))
}
