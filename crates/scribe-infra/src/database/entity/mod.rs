//! SeaORM table models. Each soft-deletable model converts to and from its
//! domain entity and names its columns through [`SoftDeleteEntity`].
//!
//! [`SoftDeleteEntity`]: super::SoftDeleteEntity

pub mod comment;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;

use sea_orm::prelude::DateTimeWithTimeZone;
use scribe_core::domain::Lifecycle;

/// Columns of [`Lifecycle`] as stored in every soft-deletable table.
pub(crate) struct LifecycleColumns {
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

impl From<LifecycleColumns> for Lifecycle {
    fn from(cols: LifecycleColumns) -> Self {
        Self {
            created_at: cols.created_at.into(),
            updated_at: cols.updated_at.into(),
            is_deleted: cols.is_deleted,
            deleted_at: cols.deleted_at.map(Into::into),
        }
    }
}

impl From<Lifecycle> for LifecycleColumns {
    fn from(lifecycle: Lifecycle) -> Self {
        Self {
            created_at: lifecycle.created_at.into(),
            updated_at: lifecycle.updated_at.into(),
            is_deleted: lifecycle.is_deleted,
            deleted_at: lifecycle.deleted_at.map(Into::into),
        }
    }
}
