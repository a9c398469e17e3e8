//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use scribe_core::domain::{Comment, NewTag, Post, PostDetail, Tag, TagChanges, User};
use scribe_core::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use scribe_core::services::{CreatePost, CreateUser, UpdatePost, UpdateProfile, UpdateUser};
use scribe_core::{DeletedFilter, DomainError, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{double_option, validate_password_strength};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl AuthResponse {
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 40), custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
}

/// Superuser request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 40), custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            is_superuser: req.is_superuser,
        }
    }
}

/// Superuser request to update any account. `full_name: null` clears the name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 40), custom(function = "validate_password_strength"))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255))]
    pub full_name: Option<Option<String>>,
    pub is_superuser: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            full_name: req.full_name.into(),
            is_superuser: req.is_superuser,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255))]
    pub full_name: Option<Option<String>>,
}

impl From<UpdateMeRequest> for UpdateProfile {
    fn from(req: UpdateMeRequest) -> Self {
        Self {
            email: req.email,
            full_name: req.full_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 40), custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_superuser: user.is_superuser,
            created_at: user.lifecycle.created_at,
            updated_at: user.lifecycle.updated_at,
            is_deleted: user.lifecycle.is_deleted,
            deleted_at: user.lifecycle.deleted_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 255))]
    pub title: String,
    #[validate(length(min = 10))]
    pub content: String,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl From<CreatePostRequest> for CreatePost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            tag_ids: req.tag_ids,
        }
    }
}

/// Omitted `tag_ids` keeps the current tags; an empty list removes them all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 10))]
    pub content: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
}

impl From<UpdatePostRequest> for UpdatePost {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            tag_ids: req.tag_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            created_at: post.lifecycle.created_at,
            updated_at: post.lifecycle.updated_at,
            is_deleted: post.lifecycle.is_deleted,
            deleted_at: post.lifecycle.deleted_at,
        }
    }
}

/// A post with its author, tags and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: UserResponse,
    pub tags: Vec<TagResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<PostDetail> for PostDetailResponse {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            author: detail.author.into(),
            tags: detail.tags.into_iter().map(Into::into).collect(),
            comments: detail.comments.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

impl From<CreateTagRequest> for NewTag {
    fn from(req: CreateTagRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255))]
    pub description: Option<Option<String>>,
}

impl From<UpdateTagRequest> for TagChanges {
    fn from(req: UpdateTagRequest) -> Self {
        Self {
            name: req.name,
            description: req.description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            description: tag.description,
            created_at: tag.lifecycle.created_at,
            updated_at: tag.lifecycle.updated_at,
            is_deleted: tag.lifecycle.is_deleted,
            deleted_at: tag.lifecycle.deleted_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            content: comment.content,
            created_at: comment.lifecycle.created_at,
            updated_at: comment.lifecycle.updated_at,
            is_deleted: comment.lifecycle.is_deleted,
            deleted_at: comment.lifecycle.deleted_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Query string accepted by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = MAX_PAGE_SIZE))]
    pub page_size: u64,
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default)]
    pub only_deleted: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            include_deleted: false,
            only_deleted: false,
        }
    }
}

impl ListQuery {
    pub fn page_request(&self) -> Result<PageRequest, DomainError> {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn filter(&self) -> DeletedFilter {
        DeletedFilter::from_flags(self.include_deleted, self.only_deleted)
    }
}

#[cfg(test)]
mod tests {
    use scribe_core::Patch;

    use super::*;

    #[test]
    fn update_tag_distinguishes_null_from_absent() {
        let cleared: UpdateTagRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let untouched: UpdateTagRequest = serde_json::from_str(r#"{"name": "rust"}"#).unwrap();

        assert!(matches!(TagChanges::from(cleared).description, Patch::Null));
        assert!(TagChanges::from(untouched).description.is_absent());
    }

    #[test]
    fn register_rejects_weak_password_and_bad_email() {
        let req = RegisterUserRequest {
            email: "not-an-email".to_string(),
            password: "password".to_string(),
            full_name: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn list_query_defaults_and_bounds() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 100);
        assert!(query.validate().is_ok());

        let oversized = ListQuery {
            page_size: 101,
            ..ListQuery::default()
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn short_post_title_is_rejected() {
        let req = CreatePostRequest {
            title: "Hi".to_string(),
            content: "long enough content".to_string(),
            tag_ids: vec![],
        };
        assert!(req.validate().is_err());
    }
}
