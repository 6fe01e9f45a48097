use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostTag::Id).big_unsigned().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(PostTag::PostId).big_unsigned().not_null())
                    .col(ColumnDef::new(PostTag::TagId).big_unsigned().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-post_tag-post_id")
                            .from(PostTag::Table, PostTag::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-post_tag-tag_id")
                            .from(PostTag::Table, PostTag::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostTag::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PostTag {
    Table,
    Id,
    PostId,
    TagId,
}

#[derive(DeriveIden)]
pub enum Posts {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub enum Tags {
    Table,
    Id,
}
