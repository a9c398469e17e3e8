use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamps and soft-delete state shared by every persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    /// Fresh lifecycle for a record created now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Refresh `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Mark as soft-deleted. `deleted_at` is set iff `is_deleted` is true.
    pub fn mark_deleted(&mut self) {
        let now = Utc::now();
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn mark_restored(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
        self.updated_at = Utc::now();
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// A soft-deletable record managed by a [`SoftDeleteRepository`].
///
/// `Create` carries the caller-provided fields of a new record; `Changes`
/// carries a partial update where absent fields are left untouched.
///
/// [`SoftDeleteRepository`]: crate::ports::SoftDeleteRepository
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human readable type name used in errors and logs.
    const NAME: &'static str;

    type Create: Send + 'static;
    type Changes: Send + 'static;

    fn id(&self) -> Uuid;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Build a new record, assigning its id and timestamps.
    fn from_create(input: Self::Create) -> Self;

    /// Apply the fields present in `changes`. Does not touch timestamps.
    fn apply(&mut self, changes: Self::Changes);

    fn is_deleted(&self) -> bool {
        self.lifecycle().is_deleted
    }

    /// Apply `changes` and refresh `updated_at`.
    fn apply_changes(&mut self, changes: Self::Changes) {
        self.apply(changes);
        self.lifecycle_mut().touch();
    }
}
