//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::CommentChanges;
use scribe_shared::MessageResponse;
use scribe_shared::dto::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppResult, validated};
use crate::state::AppState;

/// POST /comments
pub async fn create_comment(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let comment = state
        .services
        .comments
        .create_comment(&current.actor, req.post_id, req.content)
        .await?;

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// GET /comments/{id}
pub async fn get_comment(
    state: web::Data<AppState>,
    _current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .services
        .comments
        .get_comment(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

/// PUT /comments/{id}
pub async fn update_comment(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let comment = state
        .services
        .comments
        .update_comment(
            &current.actor,
            path.into_inner(),
            CommentChanges {
                content: req.content,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .comments
        .delete_comment(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}

/// POST /comments/{id}/restore
pub async fn restore_comment(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .services
        .comments
        .restore_comment(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}
