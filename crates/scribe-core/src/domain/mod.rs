//! Domain entities - the core business objects.

mod comment;
mod entity;
mod post;
mod tag;
mod user;

pub use comment::{Comment, CommentChanges, NewComment};
pub use entity::{Entity, Lifecycle};
pub use post::{NewPost, Post, PostChanges, PostDetail};
pub use tag::{NewTag, Tag, TagChanges};
pub use user::{NewUser, User, UserChanges};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Patch;

    #[test]
    fn new_entity_is_active() {
        let post = Post::new(uuid::Uuid::new_v4(), "Title".into(), "Body text!".into());
        assert!(!post.is_deleted());
        assert!(post.lifecycle.deleted_at.is_none());
        assert_eq!(post.lifecycle.created_at, post.lifecycle.updated_at);
    }

    #[test]
    fn soft_delete_and_restore_keep_deleted_at_in_sync() {
        let mut user = User::new("a@b.io".into(), "hash".into());

        user.lifecycle.mark_deleted();
        assert!(user.is_deleted());
        assert!(user.lifecycle.deleted_at.is_some());

        user.lifecycle.mark_restored();
        assert!(!user.is_deleted());
        assert!(user.lifecycle.deleted_at.is_none());
    }

    #[test]
    fn apply_changes_only_touches_present_fields() {
        let mut tag = Tag::from_create(NewTag {
            name: "rust".into(),
            description: Some("systems".into()),
        });
        let before = tag.lifecycle.updated_at;

        tag.apply_changes(TagChanges {
            name: None,
            description: Patch::Absent,
        });
        assert_eq!(tag.name, "rust");
        assert_eq!(tag.description.as_deref(), Some("systems"));
        assert!(tag.lifecycle.updated_at >= before);

        tag.apply_changes(TagChanges {
            name: Some("rustlang".into()),
            description: Patch::Null,
        });
        assert_eq!(tag.name, "rustlang");
        assert_eq!(tag.description, None);
    }

    #[test]
    fn user_changes_rehash_without_touching_email() {
        let mut user = User::new("a@b.io".into(), "old".into());
        user.apply(UserChanges {
            password_hash: Some("new".into()),
            ..Default::default()
        });
        assert_eq!(user.email, "a@b.io");
        assert_eq!(user.password_hash, "new");
    }
}
