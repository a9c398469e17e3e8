//! Tag entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::LifecycleColumns;
use crate::database::SoftDeleteEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(indexed)]
    pub is_deleted: bool,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDeleteEntity for Entity {
    type Domain = scribe_core::domain::Tag;

    fn id_column() -> Column {
        Column::Id
    }
    fn created_at_column() -> Column {
        Column::CreatedAt
    }
    fn updated_at_column() -> Column {
        Column::UpdatedAt
    }
    fn is_deleted_column() -> Column {
        Column::IsDeleted
    }
    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}

impl From<Model> for scribe_core::domain::Tag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            lifecycle: LifecycleColumns {
                created_at: model.created_at,
                updated_at: model.updated_at,
                is_deleted: model.is_deleted,
                deleted_at: model.deleted_at,
            }
            .into(),
        }
    }
}

impl From<scribe_core::domain::Tag> for ActiveModel {
    fn from(tag: scribe_core::domain::Tag) -> Self {
        let lifecycle = LifecycleColumns::from(tag.lifecycle);
        Self {
            id: Set(tag.id),
            name: Set(tag.name),
            description: Set(tag.description),
            created_at: Set(lifecycle.created_at),
            updated_at: Set(lifecycle.updated_at),
            is_deleted: Set(lifecycle.is_deleted),
            deleted_at: Set(lifecycle.deleted_at),
        }
    }
}
