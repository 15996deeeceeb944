pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20240601_000001_initial_tables;
mod m20240615_000001_comment_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_initial_tables::Migration),
            Box::new(m20240615_000001_comment_indexes::Migration),
        ]
    }
}
