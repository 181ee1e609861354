//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and run once at deploy
//! time by the `migrator` binary, never from request handlers.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_posting_engine;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260301_000001_posting_engine::Migration)]
    }
}
