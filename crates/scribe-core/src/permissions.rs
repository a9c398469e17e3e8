//! Ownership and superuser checks.
//!
//! Pure predicates over an [`Actor`]; nothing here touches storage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;

/// The authenticated principal a service call runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub is_superuser: bool,
}

impl Actor {
    pub fn new(id: Uuid, is_superuser: bool) -> Self {
        Self { id, is_superuser }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            is_superuser: user.is_superuser,
        }
    }
}

/// A resource owned by a single user.
pub trait HasOwner {
    fn owner_id(&self) -> Uuid;
}

pub fn is_owner(actor: &Actor, resource: &impl HasOwner) -> bool {
    actor.id == resource.owner_id()
}

pub fn is_superuser(actor: &Actor) -> bool {
    actor.is_superuser
}

pub fn can_modify(actor: &Actor, resource: &impl HasOwner) -> bool {
    is_superuser(actor) || is_owner(actor, resource)
}

pub fn can_delete(actor: &Actor, resource: &impl HasOwner) -> bool {
    can_modify(actor, resource)
}

pub fn can_view_deleted(actor: &Actor) -> bool {
    is_superuser(actor)
}

pub fn require_owner_or_superuser(
    actor: &Actor,
    resource: &impl HasOwner,
) -> Result<(), DomainError> {
    if !can_modify(actor, resource) {
        tracing::debug!(actor_id = %actor.id, owner_id = %resource.owner_id(), "Ownership check failed");
        return Err(DomainError::Forbidden(
            "Not enough permissions to perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_superuser(actor: &Actor) -> Result<(), DomainError> {
    if !is_superuser(actor) {
        return Err(DomainError::Forbidden(
            "Superuser privileges required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owned(Uuid);

    impl HasOwner for Owned {
        fn owner_id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn owner_can_modify() {
        let actor = Actor::new(Uuid::new_v4(), false);
        let resource = Owned(actor.id);

        assert!(is_owner(&actor, &resource));
        assert!(can_modify(&actor, &resource));
        assert!(can_delete(&actor, &resource));
        assert!(require_owner_or_superuser(&actor, &resource).is_ok());
    }

    #[test]
    fn superuser_can_modify_anything() {
        let admin = Actor::new(Uuid::new_v4(), true);
        let resource = Owned(Uuid::new_v4());

        assert!(!is_owner(&admin, &resource));
        assert!(can_modify(&admin, &resource));
        assert!(require_superuser(&admin).is_ok());
        assert!(can_view_deleted(&admin));
    }

    #[test]
    fn stranger_is_forbidden() {
        let actor = Actor::new(Uuid::new_v4(), false);
        let resource = Owned(Uuid::new_v4());

        assert!(!can_modify(&actor, &resource));
        assert!(matches!(
            require_owner_or_superuser(&actor, &resource),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            require_superuser(&actor),
            Err(DomainError::Forbidden(_))
        ));
        assert!(!can_view_deleted(&actor));
    }
}
