pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20250301_000001_create_links;
mod m20250301_000002_link_indexes;

pub struct Migrator;

/// Migrations are applied in the order listed here, each exactly once.
/// Applied names are tracked in the `seaql_migrations` table.
#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_links::Migration),
            Box::new(m20250301_000002_link_indexes::Migration),
        ]
    }
}
