//! Tag handlers. Reads are open to any user; writes need a superuser.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_shared::dto::{CreateTagRequest, ListQuery, TagResponse, UpdateTagRequest};
use scribe_shared::{MessageResponse, PaginatedResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppResult, validated};
use crate::state::AppState;

/// GET /tags
pub async fn list_tags(
    state: web::Data<AppState>,
    current: CurrentUser,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = validated(query.into_inner())?;

    let page = state
        .services
        .tags
        .list_tags(&current.actor, query.page_request()?, query.filter())
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::<TagResponse>::from(page)))
}

/// POST /tags
pub async fn create_tag(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let tag = state
        .services
        .tags
        .create_tag(&current.actor, req.into())
        .await?;

    Ok(HttpResponse::Created().json(TagResponse::from(tag)))
}

/// GET /tags/{id}
pub async fn get_tag(
    state: web::Data<AppState>,
    _current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let tag = state.services.tags.get_tag(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TagResponse::from(tag)))
}

/// PUT /tags/{id}
pub async fn update_tag(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTagRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let tag = state
        .services
        .tags
        .update_tag(&current.actor, path.into_inner(), req.into())
        .await?;

    Ok(HttpResponse::Ok().json(TagResponse::from(tag)))
}

/// DELETE /tags/{id}
pub async fn delete_tag(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .tags
        .delete_tag(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Tag deleted successfully")))
}

/// POST /tags/{id}/restore
pub async fn restore_tag(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let tag = state
        .services
        .tags
        .restore_tag(&current.actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(TagResponse::from(tag)))
}
