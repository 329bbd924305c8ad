//! Create ships table migration

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ships::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ships::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Ships::Imo)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Ships::Flag)
                            .string_len(50)
                            .not_null()
                            .default("Ecuador"),
                    )
                    .col(
                        ColumnDef::new(Ships::ShipType)
                            .string_len(20)
                            .not_null()
                            .default("cargo"),
                    )
                    .col(
                        ColumnDef::new(Ships::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Ships::RegisteredBy).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ships_registered_by")
                            .from(Ships::Table, Ships::RegisteredBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on registered_by for per-user counts
        manager
            .create_index(
                Index::create()
                    .name("idx_ships_registered_by")
                    .table(Ships::Table)
                    .col(Ships::RegisteredBy)
                    .to_owned(),
            )
            .await?;

        // Create index on registered_at for the newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_ships_registered_at")
                    .table(Ships::Table)
                    .col(Ships::RegisteredAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Ships {
    Table,
    Id,
    Name,
    Imo,
    Flag,
    ShipType,
    RegisteredAt,
    RegisteredBy,
}
