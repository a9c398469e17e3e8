use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Entity;
use crate::error::DomainError;
use crate::pagination::{DeletedFilter, Page, PageRequest};
use crate::permissions::{self, Actor};
use crate::ports::SoftDeleteRepository;

/// Fails unless `actor` may see soft-deleted rows under `filter`.
pub fn ensure_can_view(actor: &Actor, filter: DeletedFilter) -> Result<(), DomainError> {
    if filter.reveals_deleted() && !permissions::can_view_deleted(actor) {
        return Err(DomainError::Forbidden(
            "Insufficient permissions to view deleted items".to_string(),
        ));
    }
    Ok(())
}

/// Pagination, lookup and soft-delete lifecycle shared by every entity service.
///
/// `R` is usually a trait object such as `dyn PostRepository`, so entity
/// services can reach their scoped queries through [`CrudService::repository`].
pub struct CrudService<T, R: ?Sized> {
    repo: Arc<R>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R: ?Sized> Clone for CrudService<T, R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            _entity: PhantomData,
        }
    }
}

impl<T, R> CrudService<T, R>
where
    T: Entity,
    R: SoftDeleteRepository<T> + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Page through `T`. Deleted-row visibility is checked before any query runs.
    pub async fn get_list_paginated(
        &self,
        actor: &Actor,
        request: PageRequest,
        filter: DeletedFilter,
    ) -> Result<Page<T>, DomainError> {
        ensure_can_view(actor, filter)?;

        let items = self
            .repo
            .list(request.skip(), request.limit(), filter)
            .await?;
        let total = self.repo.count(filter).await?;

        Ok(Page::new(items, total, request))
    }

    /// Load by id. With `include_deleted`, a non-superuser actor is refused;
    /// internal callers pass no actor.
    pub async fn get_by_id(
        &self,
        id: Uuid,
        actor: Option<&Actor>,
        include_deleted: bool,
    ) -> Result<T, DomainError> {
        if let Some(actor) = actor.filter(|_| include_deleted) {
            ensure_can_view(actor, DeletedFilter::Include)?;
        }

        self.repo
            .get(id, include_deleted)
            .await?
            .ok_or_else(|| DomainError::not_found(T::NAME, id))
    }

    pub async fn create(&self, input: T::Create) -> Result<T, DomainError> {
        let created = self.repo.create(input).await?;
        tracing::debug!(entity = T::NAME, id = %created.id(), "Created");
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, changes: T::Changes) -> Result<T, DomainError> {
        let existing = self.get_by_id(id, None, false).await?;
        self.apply_update(existing, changes).await
    }

    /// Persist `changes` on an entity the caller already loaded and authorized.
    pub async fn apply_update(&self, existing: T, changes: T::Changes) -> Result<T, DomainError> {
        Ok(self.repo.update(existing, changes).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        if !self.repo.soft_delete(id).await? {
            return Err(DomainError::not_found(T::NAME, id));
        }
        tracing::info!(entity = T::NAME, %id, "Soft-deleted");
        Ok(true)
    }

    pub async fn restore(&self, id: Uuid) -> Result<T, DomainError> {
        let restored = self
            .repo
            .restore(id)
            .await?
            .ok_or_else(|| DomainError::not_found(T::NAME, id))?;
        tracing::info!(entity = T::NAME, %id, "Restored");
        Ok(restored)
    }

    pub async fn count(&self, filter: DeletedFilter) -> Result<u64, DomainError> {
        Ok(self.repo.count(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::{NewTag, Tag, TagChanges};
    use crate::error::RepoError;

    /// Fails the test if any storage call is made.
    struct UntouchableRepo;

    #[async_trait]
    impl SoftDeleteRepository<Tag> for UntouchableRepo {
        async fn get(&self, _: Uuid, _: bool) -> Result<Option<Tag>, RepoError> {
            panic!("storage touched")
        }
        async fn list(&self, _: u64, _: u64, _: DeletedFilter) -> Result<Vec<Tag>, RepoError> {
            panic!("storage touched")
        }
        async fn count(&self, _: DeletedFilter) -> Result<u64, RepoError> {
            panic!("storage touched")
        }
        async fn create(&self, _: NewTag) -> Result<Tag, RepoError> {
            panic!("storage touched")
        }
        async fn update(&self, _: Tag, _: TagChanges) -> Result<Tag, RepoError> {
            panic!("storage touched")
        }
        async fn soft_delete(&self, _: Uuid) -> Result<bool, RepoError> {
            panic!("storage touched")
        }
        async fn restore(&self, _: Uuid) -> Result<Option<Tag>, RepoError> {
            panic!("storage touched")
        }
        async fn remove(&self, _: Uuid) -> Result<bool, RepoError> {
            panic!("storage touched")
        }
    }

    fn service() -> CrudService<Tag, UntouchableRepo> {
        CrudService::new(Arc::new(UntouchableRepo))
    }

    #[tokio::test]
    async fn deleted_listing_is_refused_before_any_query() {
        let actor = Actor::new(Uuid::new_v4(), false);

        for filter in [DeletedFilter::Include, DeletedFilter::Only] {
            let result = service()
                .get_list_paginated(&actor, PageRequest::default(), filter)
                .await;
            assert!(matches!(result, Err(DomainError::Forbidden(_))));
        }
    }

    #[tokio::test]
    async fn deleted_lookup_is_refused_for_regular_actor() {
        let actor = Actor::new(Uuid::new_v4(), false);

        let result = service()
            .get_by_id(Uuid::new_v4(), Some(&actor), true)
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn superuser_may_view_deleted() {
        let admin = Actor::new(Uuid::new_v4(), true);
        assert!(ensure_can_view(&admin, DeletedFilter::Only).is_ok());
        assert!(ensure_can_view(&admin, DeletedFilter::Include).is_ok());
    }
}
