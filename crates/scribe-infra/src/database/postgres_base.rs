use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};
use uuid::Uuid;

use scribe_core::domain::Entity;
use scribe_core::error::RepoError;
use scribe_core::pagination::DeletedFilter;
use scribe_core::ports::SoftDeleteRepository;

/// A SeaORM entity whose table carries the soft-delete lifecycle columns.
pub trait SoftDeleteEntity: EntityTrait {
    /// Domain entity stored in this table.
    type Domain: Entity;

    fn id_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
    fn is_deleted_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

/// Restrict a query to the rows admitted by `filter`.
pub(crate) fn filtered<E: SoftDeleteEntity>(select: Select<E>, filter: DeletedFilter) -> Select<E> {
    match filter {
        DeletedFilter::Exclude => select.filter(E::is_deleted_column().eq(false)),
        DeletedFilter::Include => select,
        DeletedFilter::Only => select.filter(E::is_deleted_column().eq(true)),
    }
}

/// Stable listing order: oldest first, id as tie-breaker.
pub(crate) fn ordered<E: SoftDeleteEntity>(select: Select<E>) -> Select<E> {
    select
        .order_by_asc(E::created_at_column())
        .order_by_asc(E::id_column())
}

pub(crate) fn map_db_err(e: DbErr) -> RepoError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => match e {
            DbErr::Conn(err) => RepoError::Connection(err.to_string()),
            DbErr::ConnectionAcquire(err) => RepoError::Connection(err.to_string()),
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
            other => RepoError::Query(other.to_string()),
        },
    }
}

/// Write `model` only while the row is still active. A row soft-deleted since
/// it was loaded is left alone and reported as `NotFound`.
pub(crate) async fn update_active<E, C>(db: &C, model: E::ActiveModel) -> Result<E::Model, RepoError>
where
    E: SoftDeleteEntity,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    C: ConnectionTrait,
{
    E::update(model)
        .filter(E::is_deleted_column().eq(false))
        .exec(db)
        .await
        .map_err(map_db_err)
}

/// Generic PostgreSQL repository for any [`SoftDeleteEntity`].
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E> SoftDeleteRepository<E::Domain> for PostgresBaseRepository<E>
where
    E: SoftDeleteEntity,
    E::Domain: From<E::Model>,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel:
        ActiveModelTrait<Entity = E> + ActiveModelBehavior + From<E::Domain> + Send + Sync,
{
    async fn get(&self, id: Uuid, include_deleted: bool) -> Result<Option<E::Domain>, RepoError> {
        let filter = if include_deleted {
            DeletedFilter::Include
        } else {
            DeletedFilter::Exclude
        };

        let result = filtered(E::find().filter(E::id_column().eq(id)), filter)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(
        &self,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<E::Domain>, RepoError> {
        let result = ordered(filtered(E::find(), filter))
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: DeletedFilter) -> Result<u64, RepoError> {
        filtered(E::find(), filter)
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn create(
        &self,
        input: <E::Domain as Entity>::Create,
    ) -> Result<E::Domain, RepoError> {
        let entity = <E::Domain as Entity>::from_create(input);
        let active_model: E::ActiveModel = entity.into();

        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(
        &self,
        existing: E::Domain,
        changes: <E::Domain as Entity>::Changes,
    ) -> Result<E::Domain, RepoError> {
        let mut entity = existing;
        entity.apply_changes(changes);
        let active_model: E::ActiveModel = entity.into();

        let model = update_active::<E, _>(&self.db, active_model).await?;
        Ok(model.into())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let result = E::update_many()
            .col_expr(E::is_deleted_column(), Expr::value(true))
            .col_expr(E::deleted_at_column(), Expr::value(now))
            .col_expr(E::updated_at_column(), Expr::value(now))
            .filter(E::id_column().eq(id))
            .filter(E::is_deleted_column().eq(false))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected > 0 {
            return Ok(true);
        }
        // Nothing flipped: either already deleted or absent.
        Ok(self.get(id, true).await?.is_some())
    }

    async fn restore(&self, id: Uuid) -> Result<Option<E::Domain>, RepoError> {
        let Some(mut entity) = self.get(id, true).await? else {
            return Ok(None);
        };
        if !entity.is_deleted() {
            return Ok(Some(entity));
        }

        entity.lifecycle_mut().mark_restored();
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.update(&self.db).await.map_err(map_db_err)?;
        Ok(Some(model.into()))
    }

    async fn remove(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}
