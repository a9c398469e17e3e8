use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use super::{CrudService, ensure_can_view};
use crate::domain::{NewPost, Post, PostChanges, PostDetail, User};
use crate::error::DomainError;
use crate::pagination::{DeletedFilter, Page, PageRequest};
use crate::permissions::{self, Actor};
use crate::ports::{
    CommentRepository, PostRepository, SoftDeleteRepository, TagRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<Uuid>,
}

/// `tag_ids: None` keeps the current tags; `Some(vec![])` clears them.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
}

#[derive(Clone)]
pub struct PostService {
    base: CrudService<Post, dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            base: CrudService::new(posts),
            users,
            tags,
            comments,
        }
    }

    pub async fn list_posts(
        &self,
        actor: &Actor,
        request: PageRequest,
        filter: DeletedFilter,
    ) -> Result<Page<Post>, DomainError> {
        self.base.get_list_paginated(actor, request, filter).await
    }

    pub async fn list_by_author(
        &self,
        actor: &Actor,
        author_id: Uuid,
        request: PageRequest,
        filter: DeletedFilter,
    ) -> Result<Page<Post>, DomainError> {
        ensure_can_view(actor, filter)?;

        let repo = self.base.repository();
        let items = repo
            .list_by_author(author_id, request.skip(), request.limit(), filter)
            .await?;
        let total = repo.count_by_author(author_id, filter).await?;

        Ok(Page::new(items, total, request))
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.base.get_by_id(id, None, false).await
    }

    /// Active post with its author, active tags and active comments.
    pub async fn get_post_detail(&self, id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.get_post(id).await?;
        self.detail_of(post).await
    }

    async fn detail_of(&self, post: Post) -> Result<PostDetail, DomainError> {
        let author: User = self
            .users
            .get(post.author_id, true)
            .await?
            .ok_or_else(|| DomainError::not_found("User", post.author_id))?;
        let tags = self.base.repository().tags_of(post.id).await?;
        let comments = self.comments.active_for_post(post.id).await?;

        Ok(PostDetail {
            post,
            author,
            tags,
            comments,
        })
    }

    /// Every id must name an active tag; duplicates collapse.
    async fn resolve_tags(&self, tag_ids: Vec<Uuid>) -> Result<Vec<Uuid>, DomainError> {
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = tag_ids.into_iter().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Ok(unique);
        }

        let found: HashSet<Uuid> = self
            .tags
            .find_active_by_ids(&unique)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        let missing: Vec<String> = unique
            .iter()
            .filter(|id| !found.contains(*id))
            .map(Uuid::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "Unknown or deleted tag ids: {}",
                missing.join(", ")
            )));
        }

        Ok(unique)
    }

    pub async fn create_post(
        &self,
        actor: &Actor,
        input: CreatePost,
    ) -> Result<PostDetail, DomainError> {
        let tag_ids = self.resolve_tags(input.tag_ids).await?;

        let post = self
            .base
            .repository()
            .create_with_tags(
                NewPost {
                    author_id: actor.id,
                    title: input.title,
                    content: input.content,
                },
                tag_ids,
            )
            .await?;
        tracing::info!(post_id = %post.id, author_id = %actor.id, "Post created");

        self.detail_of(post).await
    }

    /// Owner or superuser only, checked before the payload is looked at.
    pub async fn update_post(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdatePost,
    ) -> Result<PostDetail, DomainError> {
        let post = self.get_post(id).await?;
        permissions::require_owner_or_superuser(actor, &post)?;

        let tag_ids = match input.tag_ids {
            Some(ids) => Some(self.resolve_tags(ids).await?),
            None => None,
        };

        let updated = self
            .base
            .repository()
            .update_with_tags(
                post,
                PostChanges {
                    title: input.title,
                    content: input.content,
                },
                tag_ids,
            )
            .await?;

        self.detail_of(updated).await
    }

    pub async fn delete_post(&self, actor: &Actor, id: Uuid) -> Result<bool, DomainError> {
        let post = self.get_post(id).await?;
        permissions::require_owner_or_superuser(actor, &post)?;
        self.base.delete(id).await
    }

    pub async fn restore_post(&self, actor: &Actor, id: Uuid) -> Result<Post, DomainError> {
        permissions::require_superuser(actor)?;
        self.base.restore(id).await
    }
}
