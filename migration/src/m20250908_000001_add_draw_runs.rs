use sea_orm_migration::prelude::*;

/// One row per executed weekly draw
#[derive(DeriveIden)]
enum DrawRuns {
    Table,
    Id,
    DrawTime,
    WinnerCount,
    ReserveCount,
    ExecutedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// The unique index on draw_time is what keeps two concurrent executors from
/// both drawing the same week: the loser's marker insert affects no rows.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DrawRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrawRuns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrawRuns::DrawTime).big_integer().not_null())
                    .col(
                        ColumnDef::new(DrawRuns::WinnerCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DrawRuns::ReserveCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DrawRuns::ExecutedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draw_runs_draw_time_unique")
                    .table(DrawRuns::Table)
                    .col(DrawRuns::DrawTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(DrawRuns::Table).to_owned())
            .await?;
        Ok(())
    }
}
