//! Symbol uniqueness among live links
//!
//! Soft-deleted rows keep their symbol, so a plain unique index would block
//! reuse. Both supported backends accept partial indexes; the predicate has to
//! be written by hand because the index builder has no WHERE clause.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        match manager.get_database_backend() {
            DatabaseBackend::Sqlite | DatabaseBackend::Postgres => {
                manager
                    .get_connection()
                    .execute_unprepared(
                        "CREATE UNIQUE INDEX IF NOT EXISTS idx_links_live_symbol \
                         ON links (symbol) WHERE deleted = FALSE",
                    )
                    .await?;
            }
            backend => {
                return Err(DbErr::Migration(format!(
                    "partial unique index unsupported on {:?}",
                    backend
                )));
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_links_live_symbol")
            .await?;
        Ok(())
    }
}
