use crate::entities::prelude::*;
use crate::entities::{missions, worker_tokens};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Workers)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(WorkerTokens)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Items)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Missions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Token lookups always filter on both columns
        manager
            .create_index(
                Index::create()
                    .name("idx_worker_tokens_worker_token")
                    .table(WorkerTokens)
                    .col(worker_tokens::Column::WorkerId)
                    .col(worker_tokens::Column::Token)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_missions_state_worker")
                    .table(Missions)
                    .col(missions::Column::State)
                    .col(missions::Column::WorkerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Missions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkerTokens).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workers).to_owned())
            .await?;

        Ok(())
    }
}
