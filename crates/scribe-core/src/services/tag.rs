use std::sync::Arc;

use uuid::Uuid;

use super::CrudService;
use crate::domain::{NewTag, Tag, TagChanges};
use crate::error::DomainError;
use crate::pagination::{DeletedFilter, Page, PageRequest};
use crate::permissions::{self, Actor};
use crate::ports::TagRepository;

/// Tags are readable by any user and managed by superusers.
#[derive(Clone)]
pub struct TagService {
    base: CrudService<Tag, dyn TagRepository>,
}

impl TagService {
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self {
            base: CrudService::new(repo),
        }
    }

    fn name_taken() -> DomainError {
        DomainError::Conflict("Tag with this name already exists".to_string())
    }

    pub async fn list_tags(
        &self,
        actor: &Actor,
        request: PageRequest,
        filter: DeletedFilter,
    ) -> Result<Page<Tag>, DomainError> {
        self.base.get_list_paginated(actor, request, filter).await
    }

    pub async fn get_tag(&self, id: Uuid) -> Result<Tag, DomainError> {
        self.base.get_by_id(id, None, false).await
    }

    pub async fn create_tag(&self, actor: &Actor, input: NewTag) -> Result<Tag, DomainError> {
        permissions::require_superuser(actor)?;

        if self.base.repository().find_by_name(&input.name).await?.is_some() {
            return Err(Self::name_taken());
        }
        self.base.create(input).await
    }

    pub async fn update_tag(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: TagChanges,
    ) -> Result<Tag, DomainError> {
        permissions::require_superuser(actor)?;
        let tag = self.get_tag(id).await?;

        if let Some(name) = changes.name.as_deref() {
            if name != tag.name {
                let holder = self.base.repository().find_by_name(name).await?;
                if holder.is_some_and(|other| other.id != tag.id) {
                    return Err(Self::name_taken());
                }
            }
        }

        self.base.apply_update(tag, changes).await
    }

    pub async fn delete_tag(&self, actor: &Actor, id: Uuid) -> Result<bool, DomainError> {
        permissions::require_superuser(actor)?;
        self.base.delete(id).await
    }

    pub async fn restore_tag(&self, actor: &Actor, id: Uuid) -> Result<Tag, DomainError> {
        permissions::require_superuser(actor)?;
        self.base.restore(id).await
    }
}
