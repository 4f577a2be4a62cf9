//! Migrate command - Database migration management.

use common::{AppError, AppResult};

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::AuthServiceConfig;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: AuthServiceConfig) -> AppResult<()> {
    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let status = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, status);
            }
        }
    }

    Ok(())
}
