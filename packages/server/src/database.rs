use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::submission;

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("scoreboard_server::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await;

    Ok(db)
}

/// Create the composite index behind every per-team submission lookup:
/// `... FROM submission WHERE task_id = ? AND user_id IN (...)`.
///
/// Schema sync does not manage composite non-unique indexes.
async fn ensure_indexes(db: &DatabaseConnection) {
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_submission_task_user")
        .table(submission::Entity)
        .col(submission::Column::TaskId)
        .col(submission::Column::UserId)
        .to_owned();

    let backend = db.get_database_backend();
    match db.execute_raw(backend.build(&stmt)).await {
        Ok(_) => info!("Ensured index idx_submission_task_user exists"),
        Err(e) => warn!("Failed to create index idx_submission_task_user: {}", e),
    }
}
