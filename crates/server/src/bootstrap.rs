use std::sync::Arc;

use axum::Router;
use storefront_core::config::{AppConfig, ConfigError, LoadOptions};
use storefront_db::{
    connect_with_config, migrations, CatalogSeedDataset, CatalogService, DbPool, RepositoryError,
    SqlProductRepository,
};
use thiserror::Error;
use tracing::info;

use crate::{health, products};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub catalog: CatalogService,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("demo catalog seeding failed: {0}")]
    Seed(#[source] RepositoryError),
}

impl Application {
    pub fn router(&self) -> Router {
        products::router(products::ProductsState::new(
            self.catalog.clone(),
            self.config.pagination.clone(),
        ))
        .merge(health::router(self.db_pool.clone()))
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    if config.catalog.seed_demo_data {
        let seeded = CatalogSeedDataset::load(&db_pool).await.map_err(BootstrapError::Seed)?;
        info!(
            event_name = "system.bootstrap.catalog_seeded",
            correlation_id = "bootstrap",
            products = seeded.products_seeded.len(),
            "demo catalog loaded"
        );
    }

    let catalog = CatalogService::new(Arc::new(SqlProductRepository::new(db_pool.clone())));

    Ok(Application { config, db_pool, catalog })
}
