//! Migrator for the partner directory schema.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_partners;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240301_000001_create_partners::Migration)]
    }
}
