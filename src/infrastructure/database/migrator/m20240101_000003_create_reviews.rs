//! Create reviews table
//!
//! One review per (point of sale, author); rows are removed together with
//! the point of sale or user they reference.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_points_of_sale::PointsOfSale;
use super::m20240101_000002_create_users::Users;

/// Name of the unique (pos_id, author_id) index, matched when mapping
/// constraint violations back to domain errors.
pub const REVIEWS_POS_AUTHOR_INDEX: &str = "idx_reviews_pos_author";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::PosId).integer().not_null())
                    .col(ColumnDef::new(Reviews::AuthorId).integer().not_null())
                    .col(ColumnDef::new(Reviews::Review).text().not_null())
                    .col(
                        ColumnDef::new(Reviews::ApprovalCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Reviews::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_point_of_sale")
                            .from(Reviews::Table, Reviews::PosId)
                            .to(PointsOfSale::Table, PointsOfSale::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_author")
                            .from(Reviews::Table, Reviews::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(REVIEWS_POS_AUTHOR_INDEX)
                    .table(Reviews::Table)
                    .col(Reviews::PosId)
                    .col(Reviews::AuthorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_pos_approved")
                    .table(Reviews::Table)
                    .col(Reviews::PosId)
                    .col(Reviews::Approved)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reviews {
    Table,
    Id,
    PosId,
    AuthorId,
    Review,
    ApprovalCount,
    Approved,
    CreatedAt,
    UpdatedAt,
}
