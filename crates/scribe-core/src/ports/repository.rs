use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Entity, NewPost, Post, PostChanges, Tag, User};
use crate::error::RepoError;
use crate::pagination::DeletedFilter;

/// Generic CRUD contract over one soft-deletable entity type.
///
/// Listings are ordered by creation time, then id, so a fixed filter
/// always pages the same way.
#[async_trait]
pub trait SoftDeleteRepository<T: Entity>: Send + Sync {
    /// Fetch by id. Soft-deleted rows are hidden unless `include_deleted`.
    async fn get(&self, id: Uuid, include_deleted: bool) -> Result<Option<T>, RepoError>;

    async fn list(&self, skip: u64, limit: u64, filter: DeletedFilter)
    -> Result<Vec<T>, RepoError>;

    /// Rows matching `filter`, ignoring skip/limit.
    async fn count(&self, filter: DeletedFilter) -> Result<u64, RepoError>;

    /// Assign id and timestamps, persist, return the stored record.
    async fn create(&self, input: T::Create) -> Result<T, RepoError>;

    /// Apply only the fields present in `changes` and refresh `updated_at`.
    async fn update(&self, existing: T, changes: T::Changes) -> Result<T, RepoError>;

    /// Flag the row as deleted. `false` only when no row has this id;
    /// an already-deleted row still yields `true`.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Clear the deleted flag. `None` when the row does not exist; a row
    /// that is not deleted comes back unchanged.
    async fn restore(&self, id: Uuid) -> Result<Option<T>, RepoError>;

    /// Irreversible delete. `false` when no row has this id.
    async fn remove(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: SoftDeleteRepository<User> {
    /// Find a user by their email address.
    async fn find_by_email(
        &self,
        email: &str,
        include_deleted: bool,
    ) -> Result<Option<User>, RepoError>;
}

/// Post repository, including the post/tag association.
#[async_trait]
pub trait PostRepository: SoftDeleteRepository<Post> {
    async fn list_by_author(
        &self,
        author_id: Uuid,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<Post>, RepoError>;

    async fn count_by_author(&self, author_id: Uuid, filter: DeletedFilter)
    -> Result<u64, RepoError>;

    /// Insert the post and its tag links in one transaction.
    async fn create_with_tags(&self, input: NewPost, tag_ids: Vec<Uuid>)
    -> Result<Post, RepoError>;

    /// Apply `changes` and, when `tag_ids` is given, replace the tag set;
    /// one transaction.
    async fn update_with_tags(
        &self,
        existing: Post,
        changes: PostChanges,
        tag_ids: Option<Vec<Uuid>>,
    ) -> Result<Post, RepoError>;

    /// Active tags linked to a post.
    async fn tags_of(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;
}

#[async_trait]
pub trait TagRepository: SoftDeleteRepository<Tag> {
    /// Exact-name lookup across active and deleted tags, since names stay
    /// reserved while a tag is soft-deleted.
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: SoftDeleteRepository<Comment> {
    async fn list_by_post(
        &self,
        post_id: Uuid,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<Comment>, RepoError>;

    async fn count_by_post(&self, post_id: Uuid, filter: DeletedFilter) -> Result<u64, RepoError>;

    /// Every active comment of a post, oldest first.
    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// The full set of repositories a service layer is built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
}
