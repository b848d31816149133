use sea_orm_migration::prelude::*;

/// Weekly registration pool
#[derive(DeriveIden)]
enum Registrations {
    Table,
    Id,
    StudentId,
    FirstName,
    LastName,
    SubmittedAt,
    DrawTime,
}

/// Draw results (winner / reserve)
#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
    StudentId,
    FirstName,
    LastName,
    DrawTime,
    Category,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// draw_time is the Unix timestamp (seconds) of the Monday 05:00 boundary
/// that opens the week the row belongs to.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Registrations::StudentId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::FirstName)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::LastName)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::DrawTime)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // one registration per student per week
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_registrations_student_draw_unique")
                    .table(Registrations::Table)
                    .col(Registrations::StudentId)
                    .col(Registrations::DrawTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_registrations_draw_time")
                    .table(Registrations::Table)
                    .col(Registrations::DrawTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Winners::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Winners::StudentId).string_len(64).not_null())
                    .col(ColumnDef::new(Winners::FirstName).string_len(64).not_null())
                    .col(ColumnDef::new(Winners::LastName).string_len(64).not_null())
                    .col(ColumnDef::new(Winners::DrawTime).big_integer().not_null())
                    .col(
                        ColumnDef::new(Winners::Category)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(Winners::Category).is_in(["winner", "reserve"])),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winners_draw_time_category")
                    .table(Winners::Table)
                    .col(Winners::DrawTime)
                    .col(Winners::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Winners::Table).to_owned())
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Registrations::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
