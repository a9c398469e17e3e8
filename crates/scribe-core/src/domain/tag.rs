use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, Lifecycle};
use crate::patch::Patch;

/// Tag entity - a uniquely named label attached to posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TagChanges {
    pub name: Option<String>,
    pub description: Patch<String>,
}

impl Entity for Tag {
    const NAME: &'static str = "Tag";

    type Create = NewTag;
    type Changes = TagChanges;

    fn id(&self) -> Uuid {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn from_create(input: NewTag) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            lifecycle: Lifecycle::new(),
        }
    }

    fn apply(&mut self, changes: TagChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        changes.description.apply_to(&mut self.description);
    }
}
