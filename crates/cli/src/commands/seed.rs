use crate::commands::CommandResult;
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_db::{connect_with_config, migrations, CatalogSeedDataset, ProductSeedInfo};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let outcome = async {
            migrations::run_pending(&pool)
                .await
                .map_err(|error| ("migration", error.to_string(), 5u8))?;

            let seeded = CatalogSeedDataset::load(&pool)
                .await
                .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

            let verification = CatalogSeedDataset::verify(&pool)
                .await
                .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

            if !verification.all_present {
                let missing = verification
                    .checks
                    .iter()
                    .filter_map(|(name, present)| (!present).then_some(*name))
                    .collect::<Vec<_>>();
                return Err(("seed_verification", verification_message(&missing), 6u8));
            }

            Ok::<_, (&'static str, String, u8)>(seeded.products_seeded)
        }
        .await;

        pool.close().await;
        outcome
    });

    match result {
        Ok(products) => CommandResult::success("seed", seed_summary(&products)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn seed_summary(products: &[ProductSeedInfo]) -> String {
    let lines = products
        .iter()
        .map(|product| format!("  - {}: {}", product.id, product.name))
        .collect::<Vec<_>>();
    format!("demo catalog loaded with {} products:\n{}", products.len(), lines.join("\n"))
}

fn verification_message(missing: &[&str]) -> String {
    if missing.is_empty() {
        "demo catalog verification failed".to_string()
    } else {
        format!("demo catalog verification failed for: {}", missing.join(", "))
    }
}
