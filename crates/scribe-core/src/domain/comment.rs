use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, Lifecycle};
use crate::permissions::HasOwner;

/// Comment entity - a reply left on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub content: Option<String>,
}

impl Entity for Comment {
    const NAME: &'static str = "Comment";

    type Create = NewComment;
    type Changes = CommentChanges;

    fn id(&self) -> Uuid {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn from_create(input: NewComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id: input.post_id,
            author_id: input.author_id,
            content: input.content,
            lifecycle: Lifecycle::new(),
        }
    }

    fn apply(&mut self, changes: CommentChanges) {
        if let Some(content) = changes.content {
            self.content = content;
        }
    }
}

impl HasOwner for Comment {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}
