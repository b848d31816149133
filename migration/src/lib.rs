pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_registrations_and_winners;
mod m20250908_000001_add_draw_runs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_registrations_and_winners::Migration),
            Box::new(m20250908_000001_add_draw_runs::Migration),
        ]
    }
}
