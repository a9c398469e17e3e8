use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use scribe_core::domain::{NewPost, Post, PostChanges, Tag};
use scribe_core::error::RepoError;
use scribe_core::pagination::DeletedFilter;
use scribe_core::ports::{PostRepository, SoftDeleteRepository, TagRepository};

use super::entity::{post, tag};
use super::postgres_base::map_db_err;
use super::postgres_repo::{PostgresPostRepository, PostgresTagRepository};

fn post_model(id: Uuid, author_id: Uuid, deleted: bool) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        title: "Test Post".to_owned(),
        content: "Content long enough".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
        is_deleted: deleted,
        deleted_at: deleted.then(|| now.into()),
    }
}

fn tag_model(name: &str) -> tag::Model {
    let now = Utc::now();
    tag::Model {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        description: None,
        created_at: now.into(),
        updated_at: now.into(),
        is_deleted: false,
        deleted_at: None,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(n))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, author_id, false)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.get(post_id, false).await.unwrap().unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert!(!post.lifecycle.is_deleted);
}

#[tokio::test]
async fn test_deleted_row_keeps_its_timestamp() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, Uuid::new_v4(), true)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo.get(post_id, true).await.unwrap().unwrap();
    assert!(post.lifecycle.is_deleted);
    assert!(post.lifecycle.deleted_at.is_some());
}

#[tokio::test]
async fn test_soft_delete_flips_active_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.soft_delete(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_soft_delete_twice_still_reports_true() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .append_query_results([vec![post_model(post_id, Uuid::new_v4(), true)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.soft_delete(post_id).await.unwrap());
}

#[tokio::test]
async fn test_soft_delete_missing_row_reports_false() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(!repo.soft_delete(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_restore_active_row_is_unchanged() {
    let post_id = Uuid::new_v4();
    let model = post_model(post_id, Uuid::new_v4(), false);

    // Only the lookup is queued: an active row must not be written.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let restored = repo.restore(post_id).await.unwrap().unwrap();
    assert_eq!(restored.lifecycle.updated_at, chrono::DateTime::<Utc>::from(model.updated_at));
}

#[tokio::test]
async fn test_count_by_author() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(25)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let total = repo
        .count_by_author(Uuid::new_v4(), DeletedFilter::Exclude)
        .await
        .unwrap();
    assert_eq!(total, 25);
}

#[tokio::test]
async fn test_create_with_tags_runs_in_one_transaction() {
    let author_id = Uuid::new_v4();
    let inserted = post_model(Uuid::new_v4(), author_id, false);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![inserted.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo
        .create_with_tags(
            NewPost {
                author_id,
                title: inserted.title.clone(),
                content: inserted.content.clone(),
            },
            vec![Uuid::new_v4(), Uuid::new_v4()],
        )
        .await
        .unwrap();

    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_find_active_tags_skips_query_for_no_ids() {
    // No results queued: any query would fail the test.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresTagRepository::new(db);

    let tags: Vec<Tag> = repo.find_active_by_ids(&[]).await.unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn test_find_tag_by_name() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag_model("rust")]])
        .into_connection();
    let repo = PostgresTagRepository::new(db);

    let found = repo.find_by_name("rust").await.unwrap();
    assert_eq!(found.map(|t| t.name).as_deref(), Some("rust"));
}

#[test]
fn test_unmatched_update_maps_to_not_found() {
    assert!(matches!(
        map_db_err(DbErr::RecordNotUpdated),
        RepoError::NotFound
    ));
}

#[tokio::test]
async fn test_update_writes_active_row() {
    let id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let mut stored = post_model(id, author_id, false);
    stored.title = "Renamed".to_owned();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let loaded: Post = post_model(id, author_id, false).into();
    let updated = repo
        .update(
            loaded,
            PostChanges {
                title: Some("Renamed".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
}

#[tokio::test]
async fn test_update_leaves_row_deleted_since_load() {
    let id = Uuid::new_v4();
    let loaded: Post = post_model(id, Uuid::new_v4(), false).into();

    // The guarded UPDATE matches nothing once the row is soft-deleted
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let err = repo
        .update(
            loaded,
            PostChanges {
                title: Some("Too late".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}
