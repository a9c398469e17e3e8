use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    IsSuperuser,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    AuthorId,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
    DeletedAt,
}

#[derive(DeriveIden)]
enum PostTags {
    Table,
    PostId,
    TagId,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    PostId,
    AuthorId,
    Content,
    CreatedAt,
    UpdatedAt,
    IsDeleted,
    DeletedAt,
}

/// `created_at`, `updated_at`, `is_deleted`, `deleted_at` for a soft-deletable table.
fn lifecycle_columns<C: IntoIden>(
    table: &mut TableCreateStatement,
    created_at: C,
    updated_at: C,
    is_deleted: C,
    deleted_at: C,
) {
    table
        .col(
            ColumnDef::new(created_at)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated_at)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(is_deleted)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(deleted_at).timestamp_with_time_zone().null());
}

fn index(name: &str, table: impl IntoIden + 'static, column: impl IntoIden) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(column)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut users = Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Users::Email).string_len(255).not_null())
            .col(ColumnDef::new(Users::PasswordHash).string().not_null())
            .col(ColumnDef::new(Users::FullName).string_len(255).null())
            .col(
                ColumnDef::new(Users::IsSuperuser)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .to_owned();
        lifecycle_columns(
            &mut users,
            Users::CreatedAt,
            Users::UpdatedAt,
            Users::IsDeleted,
            Users::DeletedAt,
        );
        manager.create_table(users).await?;

        let mut tags = Table::create()
            .table(Tags::Table)
            .if_not_exists()
            .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Tags::Name).string_len(50).not_null())
            .col(ColumnDef::new(Tags::Description).string_len(255).null())
            .to_owned();
        lifecycle_columns(
            &mut tags,
            Tags::CreatedAt,
            Tags::UpdatedAt,
            Tags::IsDeleted,
            Tags::DeletedAt,
        );
        manager.create_table(tags).await?;

        let mut posts = Table::create()
            .table(Posts::Table)
            .if_not_exists()
            .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
            .col(ColumnDef::new(Posts::Title).string_len(255).not_null())
            .col(ColumnDef::new(Posts::Content).text().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_posts_author")
                    .from(Posts::Table, Posts::AuthorId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        lifecycle_columns(
            &mut posts,
            Posts::CreatedAt,
            Posts::UpdatedAt,
            Posts::IsDeleted,
            Posts::DeletedAt,
        );
        manager.create_table(posts).await?;

        manager
            .create_table(
                Table::create()
                    .table(PostTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostTags::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostTags::TagId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostTags::PostId)
                            .col(PostTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tags_post")
                            .from(PostTags::Table, PostTags::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tags_tag")
                            .from(PostTags::Table, PostTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        let mut comments = Table::create()
            .table(Comments::Table)
            .if_not_exists()
            .col(ColumnDef::new(Comments::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Comments::PostId).uuid().not_null())
            .col(ColumnDef::new(Comments::AuthorId).uuid().not_null())
            .col(ColumnDef::new(Comments::Content).text().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_comments_post")
                    .from(Comments::Table, Comments::PostId)
                    .to(Posts::Table, Posts::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_comments_author")
                    .from(Comments::Table, Comments::AuthorId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        lifecycle_columns(
            &mut comments,
            Comments::CreatedAt,
            Comments::UpdatedAt,
            Comments::IsDeleted,
            Comments::DeletedAt,
        );
        manager.create_table(comments).await?;

        // Unique keys stay reserved while a row is soft-deleted.
        manager
            .create_index(index("ux_users_email", Users::Table, Users::Email).unique().to_owned())
            .await?;
        manager
            .create_index(index("ux_tags_name", Tags::Table, Tags::Name).unique().to_owned())
            .await?;

        for statement in [
            index("ix_users_is_deleted", Users::Table, Users::IsDeleted),
            index("ix_tags_is_deleted", Tags::Table, Tags::IsDeleted),
            index("ix_posts_is_deleted", Posts::Table, Posts::IsDeleted),
            index("ix_posts_author_id", Posts::Table, Posts::AuthorId),
            index("ix_comments_is_deleted", Comments::Table, Comments::IsDeleted),
            index("ix_comments_post_id", Comments::Table, Comments::PostId),
        ] {
            manager.create_index(statement).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table(manager, Comments::Table).await?;
        drop_table(manager, PostTags::Table).await?;
        drop_table(manager, Posts::Table).await?;
        drop_table(manager, Tags::Table).await?;
        drop_table(manager, Users::Table).await
    }
}

async fn drop_table(manager: &SchemaManager<'_>, table: impl IntoIden + 'static) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(table).if_exists().to_owned())
        .await
}
