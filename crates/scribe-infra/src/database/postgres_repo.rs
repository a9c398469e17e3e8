//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use scribe_core::domain::{Comment, Entity, NewPost, Post, PostChanges, Tag, User};
use scribe_core::error::RepoError;
use scribe_core::pagination::DeletedFilter;
use scribe_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{
    PostgresBaseRepository, filtered, map_db_err, ordered, update_active,
};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Keep the first character of the local part, hide the rest.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{}{}", masked_local, domain)
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(
        &self,
        email: &str,
        include_deleted: bool,
    ) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let filter = if include_deleted {
            DeletedFilter::Include
        } else {
            DeletedFilter::Exclude
        };
        let result = filtered(UserEntity::find(), filter)
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// Insert one link row per tag. Callers pass deduplicated ids.
async fn link_tags<C: ConnectionTrait>(
    conn: &C,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), RepoError> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    let links = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(*tag_id),
    });
    PostTagEntity::insert_many(links)
        .exec_without_returning(conn)
        .await
        .map_err(map_db_err)?;

    Ok(())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_by_author(
        &self,
        author_id: Uuid,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<Post>, RepoError> {
        let result = ordered(filtered(PostEntity::find(), filter))
            .filter(post::Column::AuthorId.eq(author_id))
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_author(
        &self,
        author_id: Uuid,
        filter: DeletedFilter,
    ) -> Result<u64, RepoError> {
        filtered(PostEntity::find(), filter)
            .filter(post::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn create_with_tags(
        &self,
        input: NewPost,
        tag_ids: Vec<Uuid>,
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let active_model: post::ActiveModel = Post::from_create(input).into();
        let model = active_model.insert(&txn).await.map_err(map_db_err)?;
        link_tags(&txn, model.id, &tag_ids).await?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update_with_tags(
        &self,
        existing: Post,
        changes: PostChanges,
        tag_ids: Option<Vec<Uuid>>,
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut post = existing;
        post.apply_changes(changes);
        let active_model: post::ActiveModel = post.into();
        let model = update_active::<PostEntity, _>(&txn, active_model).await?;

        if let Some(tag_ids) = tag_ids {
            PostTagEntity::delete_many()
                .filter(post_tag::Column::PostId.eq(model.id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
            link_tags(&txn, model.id, &tag_ids).await?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn tags_of(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let linked = Query::select()
            .column(post_tag::Column::TagId)
            .from(PostTagEntity)
            .and_where(post_tag::Column::PostId.eq(post_id))
            .to_owned();

        let result = TagEntity::find()
            .filter(tag::Column::Id.in_subquery(linked))
            .filter(tag::Column::IsDeleted.eq(false))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .filter(tag::Column::IsDeleted.eq(false))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_by_post(
        &self,
        post_id: Uuid,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<Comment>, RepoError> {
        let result = ordered(filtered(CommentEntity::find(), filter))
            .filter(comment::Column::PostId.eq(post_id))
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: Uuid, filter: DeletedFilter) -> Result<u64, RepoError> {
        filtered(CommentEntity::find(), filter)
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = ordered(filtered(CommentEntity::find(), DeletedFilter::Exclude))
            .filter(comment::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn masks_local_part_of_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("no-at-sign"), "***");
    }
}
