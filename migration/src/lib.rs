pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261018_000001_links_and_tokens;
mod m20261018_000002_live_symbol_index;
mod m20261018_000003_invites;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_links_and_tokens::Migration),
            Box::new(m20261018_000002_live_symbol_index::Migration),
            Box::new(m20261018_000003_invites::Migration),
        ]
    }
}
