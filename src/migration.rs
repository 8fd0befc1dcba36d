//! Schema migrations for the office-hours tables.
//!
//! Run [`Migrator`] once at startup before constructing a [`SeaOrmStore`](crate::SeaOrmStore).

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_queue_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Keep our bookkeeping apart from the host application's migrations
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("office_hours_queue_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_queue_tables::Migration)]
    }
}
