//! `storefront catalog list|show`: read-only product queries through
//! [`CatalogService`] against the configured database.

use std::sync::Arc;

use storefront_core::config::{AppConfig, LoadOptions, PaginationConfig};
use storefront_core::domain::page::{PageRequest, Sort};
use storefront_core::domain::product::ProductId;
use storefront_db::{
    connect_with_config, migrations, CatalogService, DbPool, RepositoryError, SqlProductRepository,
};

use crate::commands::CommandResult;

type Failure = (&'static str, String, u8);

pub fn list(page: u32, size: Option<u32>, sort: Option<&str>) -> CommandResult {
    const COMMAND: &str = "catalog list";

    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let request = match page_request(page, size, sort, &config.pagination) {
        Ok(request) => request,
        Err(message) => return CommandResult::failure(COMMAND, "invalid_request", message, 8),
    };
    let runtime = match build_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let (pool, catalog) = open_catalog(&config).await?;
        let page = catalog.list_products(&request).await.map_err(query_failure);
        pool.close().await;
        page
    });

    match result {
        Ok(page) => {
            let message = format!(
                "page {} of {} ({} of {} products)",
                page.page,
                page.total_pages(),
                page.number_of_elements(),
                page.total_elements
            );
            CommandResult::success_with_data(COMMAND, message, &page)
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(COMMAND, error_class, message, exit_code)
        }
    }
}

pub fn show(id: i64) -> CommandResult {
    const COMMAND: &str = "catalog show";

    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let id = ProductId(id);
    let result = runtime.block_on(async {
        let (pool, catalog) = open_catalog(&config).await?;
        let found = catalog.find_by_id(&id).await.map_err(query_failure);
        pool.close().await;
        found
    });

    match result {
        Ok(Some(product)) => {
            CommandResult::success_with_data(COMMAND, format!("product {id}"), &product)
        }
        Ok(None) => {
            CommandResult::failure(COMMAND, "not_found", format!("product `{id}` was not found"), 7)
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(COMMAND, error_class, message, exit_code)
        }
    }
}

/// Same defaults and cap the HTTP listing applies.
fn page_request(
    page: u32,
    size: Option<u32>,
    sort: Option<&str>,
    pagination: &PaginationConfig,
) -> Result<PageRequest, String> {
    let size = size.unwrap_or(pagination.default_page_size).min(pagination.max_page_size);
    let sort = sort
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<Sort>)
        .transpose()
        .map_err(|error| error.to_string())?;

    Ok(PageRequest { page, size, sort })
}

fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

fn build_runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

async fn open_catalog(config: &AppConfig) -> Result<(DbPool, CatalogService), Failure> {
    let pool = connect_with_config(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

    // read-only: an outdated schema is reported, never migrated here
    let pending = match migrations::pending_count(&pool).await {
        Ok(pending) => pending,
        Err(error) => {
            pool.close().await;
            return Err(("db_connectivity", error.to_string(), 4u8));
        }
    };
    if pending > 0 {
        pool.close().await;
        return Err((
            "schema_outdated",
            format!("{pending} migration(s) pending; run `storefront migrate` first"),
            5u8,
        ));
    }

    let catalog = CatalogService::new(Arc::new(SqlProductRepository::new(pool.clone())));
    Ok((pool, catalog))
}

fn query_failure(error: RepositoryError) -> Failure {
    match error {
        RepositoryError::InvalidPage(error) => ("invalid_request", error.to_string(), 8u8),
        other => ("query_failure", other.to_string(), 8u8),
    }
}
