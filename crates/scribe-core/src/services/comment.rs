use std::sync::Arc;

use uuid::Uuid;

use super::{CrudService, ensure_can_view};
use crate::domain::{Comment, CommentChanges, NewComment};
use crate::error::DomainError;
use crate::pagination::{DeletedFilter, Page, PageRequest};
use crate::permissions::{self, Actor};
use crate::ports::{CommentRepository, PostRepository, SoftDeleteRepository};

#[derive(Clone)]
pub struct CommentService {
    base: CrudService<Comment, dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self {
            base: CrudService::new(comments),
            posts,
        }
    }

    /// Comment on an active post. A missing or soft-deleted post is NotFound.
    pub async fn create_comment(
        &self,
        actor: &Actor,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        if self.posts.get(post_id, false).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        self.base
            .create(NewComment {
                post_id,
                author_id: actor.id,
                content,
            })
            .await
    }

    pub async fn list_by_post(
        &self,
        actor: &Actor,
        post_id: Uuid,
        request: PageRequest,
        filter: DeletedFilter,
    ) -> Result<Page<Comment>, DomainError> {
        ensure_can_view(actor, filter)?;

        if self
            .posts
            .get(post_id, filter.reveals_deleted())
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Post", post_id));
        }

        let repo = self.base.repository();
        let items = repo
            .list_by_post(post_id, request.skip(), request.limit(), filter)
            .await?;
        let total = repo.count_by_post(post_id, filter).await?;

        Ok(Page::new(items, total, request))
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.base.get_by_id(id, None, false).await
    }

    pub async fn update_comment(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: CommentChanges,
    ) -> Result<Comment, DomainError> {
        let comment = self.get_comment(id).await?;
        permissions::require_owner_or_superuser(actor, &comment)?;
        self.base.apply_update(comment, changes).await
    }

    pub async fn delete_comment(&self, actor: &Actor, id: Uuid) -> Result<bool, DomainError> {
        let comment = self.get_comment(id).await?;
        permissions::require_owner_or_superuser(actor, &comment)?;
        self.base.delete(id).await
    }

    pub async fn restore_comment(&self, actor: &Actor, id: Uuid) -> Result<Comment, DomainError> {
        permissions::require_superuser(actor)?;
        self.base.restore(id).await
    }
}
