use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, Lifecycle};
use crate::patch::Patch;

/// User entity - an account that authors posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_superuser: bool,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

/// Fields for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_superuser: bool,
}

/// Partial update of a stored user.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Patch<String>,
    pub is_superuser: Option<bool>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, password_hash: String) -> Self {
        Self::from_create(NewUser {
            email,
            password_hash,
            full_name: None,
            is_superuser: false,
        })
    }
}

impl Entity for User {
    const NAME: &'static str = "User";

    type Create = NewUser;
    type Changes = UserChanges;

    fn id(&self) -> Uuid {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn from_create(input: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash: input.password_hash,
            full_name: input.full_name,
            is_superuser: input.is_superuser,
            lifecycle: Lifecycle::new(),
        }
    }

    fn apply(&mut self, changes: UserChanges) {
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(hash) = changes.password_hash {
            self.password_hash = hash;
        }
        changes.full_name.apply_to(&mut self.full_name);
        if let Some(flag) = changes.is_superuser {
            self.is_superuser = flag;
        }
    }
}
