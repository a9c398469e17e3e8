//! In-memory repositories - used when no database is configured, and by tests.
//!
//! All four repositories share one set of tables behind an async `RwLock`,
//! so hard deletes cascade and unique keys hold across them the way the
//! PostgreSQL schema enforces. Data is lost on process restart.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Comment, Entity, NewPost, Post, PostChanges, Tag, User};
use scribe_core::error::RepoError;
use scribe_core::pagination::DeletedFilter;
use scribe_core::ports::{
    CommentRepository, PostRepository, Repositories, SoftDeleteRepository, TagRepository,
    UserRepository,
};

/// Rows of every table, in insertion order.
#[derive(Default)]
pub struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    tags: Vec<Tag>,
    comments: Vec<Comment>,
    post_tags: Vec<(Uuid, Uuid)>,
}

impl Tables {
    fn drop_post(&mut self, post_id: Uuid) {
        self.posts.retain(|p| p.id != post_id);
        self.comments.retain(|c| c.post_id != post_id);
        self.post_tags.retain(|(p, _)| *p != post_id);
    }
}

/// Per-entity access to [`Tables`] plus the constraints the schema would enforce.
pub trait MemoryTable: Entity {
    fn rows(tables: &Tables) -> &Vec<Self>;
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;

    /// True when `self` and `other` collide on a unique column.
    fn clashes(&self, _other: &Self) -> bool {
        false
    }

    /// Foreign keys of `self` must point at existing rows.
    fn check_references(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Drop dependent rows after a hard delete of `id`.
    fn cascade(_tables: &mut Tables, _id: Uuid) {}
}

fn missing_reference(what: &str, id: Uuid) -> RepoError {
    RepoError::Constraint(format!("{what} {id} does not exist"))
}

impl MemoryTable for User {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.users
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.users
    }

    fn clashes(&self, other: &Self) -> bool {
        self.email == other.email
    }

    fn cascade(tables: &mut Tables, id: Uuid) {
        let authored: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in authored {
            tables.drop_post(post_id);
        }
        tables.comments.retain(|c| c.author_id != id);
    }
}

impl MemoryTable for Post {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.posts
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.posts
    }

    fn check_references(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.iter().any(|u| u.id == self.author_id) {
            return Err(missing_reference("user", self.author_id));
        }
        Ok(())
    }

    fn cascade(tables: &mut Tables, id: Uuid) {
        tables.drop_post(id);
    }
}

impl MemoryTable for Tag {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.tags
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.tags
    }

    fn clashes(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn cascade(tables: &mut Tables, id: Uuid) {
        tables.post_tags.retain(|(_, t)| *t != id);
    }
}

impl MemoryTable for Comment {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.comments
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.comments
    }

    fn check_references(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.iter().any(|p| p.id == self.post_id) {
            return Err(missing_reference("post", self.post_id));
        }
        if !tables.users.iter().any(|u| u.id == self.author_id) {
            return Err(missing_reference("user", self.author_id));
        }
        Ok(())
    }
}

/// Rows admitted by `filter` and `keep`, oldest first with id as tie-breaker.
fn select<T: MemoryTable>(
    tables: &Tables,
    filter: DeletedFilter,
    keep: impl Fn(&T) -> bool,
) -> Vec<T> {
    let mut rows: Vec<T> = T::rows(tables)
        .iter()
        .filter(|row| filter.admits(row.is_deleted()) && keep(*row))
        .cloned()
        .collect();
    rows.sort_by_key(|row| (row.lifecycle().created_at, row.id()));
    rows
}

fn window<T>(rows: Vec<T>, skip: u64, limit: u64) -> Vec<T> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    rows.into_iter().skip(skip).take(limit).collect()
}

/// Reject `row` if it would break a unique key or a foreign key.
fn check_row<T: MemoryTable>(tables: &Tables, row: &T) -> Result<(), RepoError> {
    let duplicate = T::rows(tables)
        .iter()
        .any(|other| other.id() != row.id() && row.clashes(other));
    if duplicate {
        return Err(RepoError::Constraint(format!(
            "duplicate key value violates unique constraint on {}",
            T::NAME
        )));
    }
    row.check_references(tables)
}

fn insert<T: MemoryTable>(tables: &mut Tables, row: T) -> Result<T, RepoError> {
    check_row(tables, &row)?;
    T::rows_mut(tables).push(row.clone());
    Ok(row)
}

/// Overwrite the stored row having the same id, provided it is still active.
fn replace<T: MemoryTable>(tables: &mut Tables, row: T) -> Result<T, RepoError> {
    check_row(tables, &row)?;
    let slot = T::rows_mut(tables)
        .iter_mut()
        .find(|stored| stored.id() == row.id() && !stored.is_deleted())
        .ok_or(RepoError::NotFound)?;
    *slot = row.clone();
    Ok(row)
}

fn link_tags(tables: &mut Tables, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
    if let Some(unknown) = tag_ids
        .iter()
        .find(|id| !tables.tags.iter().any(|t| t.id == **id))
    {
        return Err(missing_reference("tag", *unknown));
    }
    tables
        .post_tags
        .extend(tag_ids.iter().map(|tag_id| (post_id, *tag_id)));
    Ok(())
}

/// Shared in-memory tables; clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repository<T: MemoryTable>(&self) -> InMemoryRepository<T> {
        InMemoryRepository {
            store: self.clone(),
            _entity: PhantomData,
        }
    }

    /// One repository per entity, all over this store.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.repository::<User>()),
            posts: Arc::new(self.repository::<Post>()),
            tags: Arc::new(self.repository::<Tag>()),
            comments: Arc::new(self.repository::<Comment>()),
        }
    }
}

/// Generic in-memory repository for any [`MemoryTable`] entity.
pub struct InMemoryRepository<T> {
    store: InMemoryStore,
    _entity: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: MemoryTable> SoftDeleteRepository<T> for InMemoryRepository<T> {
    async fn get(&self, id: Uuid, include_deleted: bool) -> Result<Option<T>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(T::rows(&tables)
            .iter()
            .find(|row| row.id() == id && (include_deleted || !row.is_deleted()))
            .cloned())
    }

    async fn list(
        &self,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<T>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(window(select(&tables, filter, |_: &T| true), skip, limit))
    }

    async fn count(&self, filter: DeletedFilter) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(T::rows(&tables)
            .iter()
            .filter(|row| filter.admits(row.is_deleted()))
            .count() as u64)
    }

    async fn create(&self, input: T::Create) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        insert(&mut tables, T::from_create(input))
    }

    async fn update(&self, existing: T, changes: T::Changes) -> Result<T, RepoError> {
        let mut entity = existing;
        entity.apply_changes(changes);

        let mut tables = self.store.tables.write().await;
        replace(&mut tables, entity)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.store.tables.write().await;
        let Some(row) = T::rows_mut(&mut tables).iter_mut().find(|row| row.id() == id) else {
            return Ok(false);
        };
        if !row.is_deleted() {
            row.lifecycle_mut().mark_deleted();
        }
        Ok(true)
    }

    async fn restore(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let mut tables = self.store.tables.write().await;
        let Some(row) = T::rows_mut(&mut tables).iter_mut().find(|row| row.id() == id) else {
            return Ok(None);
        };
        if row.is_deleted() {
            row.lifecycle_mut().mark_restored();
        }
        Ok(Some(row.clone()))
    }

    async fn remove(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.store.tables.write().await;
        let rows = T::rows_mut(&mut tables);
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Ok(false);
        }

        T::cascade(&mut tables, id);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_email(
        &self,
        email: &str,
        include_deleted: bool,
    ) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email && (include_deleted || !u.lifecycle.is_deleted))
            .cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository<Post> {
    async fn list_by_author(
        &self,
        author_id: Uuid,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let rows = select(&tables, filter, |p: &Post| p.author_id == author_id);
        Ok(window(rows, skip, limit))
    }

    async fn count_by_author(
        &self,
        author_id: Uuid,
        filter: DeletedFilter,
    ) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .filter(|p| p.author_id == author_id && filter.admits(p.lifecycle.is_deleted))
            .count() as u64)
    }

    async fn create_with_tags(
        &self,
        input: NewPost,
        tag_ids: Vec<Uuid>,
    ) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let post = Post::from_create(input);
        check_row(&tables, &post)?;
        link_tags(&mut tables, post.id, &tag_ids)?;
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_with_tags(
        &self,
        existing: Post,
        changes: PostChanges,
        tag_ids: Option<Vec<Uuid>>,
    ) -> Result<Post, RepoError> {
        let mut post = existing;
        post.apply_changes(changes);

        let mut tables = self.store.tables.write().await;
        check_row(&tables, &post)?;
        if !tables
            .posts
            .iter()
            .any(|p| p.id == post.id && !p.lifecycle.is_deleted)
        {
            return Err(RepoError::NotFound);
        }
        if let Some(tag_ids) = tag_ids {
            let kept: Vec<(Uuid, Uuid)> = tables
                .post_tags
                .iter()
                .copied()
                .filter(|(p, _)| *p != post.id)
                .collect();
            let previous = std::mem::replace(&mut tables.post_tags, kept);
            if let Err(e) = link_tags(&mut tables, post.id, &tag_ids) {
                tables.post_tags = previous;
                return Err(e);
            }
        }
        replace(&mut tables, post)
    }

    async fn tags_of(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .tags
            .iter()
            .filter(|t| {
                !t.lifecycle.is_deleted && tables.post_tags.contains(&(post_id, t.id))
            })
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[async_trait]
impl TagRepository for InMemoryRepository<Tag> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.tags.iter().find(|t| t.name == name).cloned())
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .tags
            .iter()
            .filter(|t| !t.lifecycle.is_deleted && ids.contains(&t.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryRepository<Comment> {
    async fn list_by_post(
        &self,
        post_id: Uuid,
        skip: u64,
        limit: u64,
        filter: DeletedFilter,
    ) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        let rows = select(&tables, filter, |c: &Comment| c.post_id == post_id);
        Ok(window(rows, skip, limit))
    }

    async fn count_by_post(&self, post_id: Uuid, filter: DeletedFilter) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && filter.admits(c.lifecycle.is_deleted))
            .count() as u64)
    }

    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(select(&tables, DeletedFilter::Exclude, |c: &Comment| {
            c.post_id == post_id
        }))
    }
}
