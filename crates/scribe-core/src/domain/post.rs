use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Comment, Entity, Lifecycle, Tag, User};
use crate::permissions::HasOwner;

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A post together with its author, active tags and active comments.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: User,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        Self::from_create(NewPost {
            author_id,
            title,
            content,
        })
    }
}

impl Entity for Post {
    const NAME: &'static str = "Post";

    type Create = NewPost;
    type Changes = PostChanges;

    fn id(&self) -> Uuid {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn from_create(input: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: input.author_id,
            title: input.title,
            content: input.content,
            lifecycle: Lifecycle::new(),
        }
    }

    fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
    }
}

impl HasOwner for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}
