//! Services - authorization and orchestration over the repository ports.
//!
//! Services are plain values built once at startup and shared by `Arc`;
//! every operation receives the acting user explicitly.

mod comment;
mod crud;
mod post;
mod tag;
mod user;

use std::sync::Arc;

pub use comment::CommentService;
pub use crud::{CrudService, ensure_can_view};
pub use post::{CreatePost, PostService, UpdatePost};
pub use tag::TagService;
pub use user::{CreateUser, UpdateProfile, UpdateUser, UserService};

use crate::ports::{PasswordService, Repositories};

/// All entity services, wired over one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub posts: PostService,
    pub tags: TagService,
    pub comments: CommentService,
}

impl Services {
    pub fn new(repos: Repositories, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            users: UserService::new(repos.users.clone(), passwords),
            posts: PostService::new(
                repos.posts.clone(),
                repos.users,
                repos.tags.clone(),
                repos.comments.clone(),
            ),
            tags: TagService::new(repos.tags),
            comments: CommentService::new(repos.comments, repos.posts),
        }
    }
}
