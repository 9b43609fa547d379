use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Products the demo catalog must contain after [`CatalogSeedDataset::load`].
const SEED_PRODUCTS: &[SeedProductContract] = &[
    SeedProductContract { id: 1, name: "Galaxy S8", price: "749.99" },
    SeedProductContract { id: 2, name: "Xperia XZ", price: "499.00" },
    SeedProductContract { id: 3, name: "iPhone 7", price: "869.00" },
    SeedProductContract { id: 4, name: "Pixel", price: "649.00" },
    SeedProductContract { id: 5, name: "Moto G5", price: "199.99" },
    SeedProductContract { id: 6, name: "Lumia 950", price: "399.50" },
];

/// Deterministic demo catalog used by `storefront seed` and local servers.
pub struct CatalogSeedDataset;

impl CatalogSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/catalog_seed_data.sql");

    /// Upserts the demo products; running it twice leaves the same rows.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let products_seeded = SEED_PRODUCTS
            .iter()
            .map(|product| ProductSeedInfo { id: product.id, name: product.name })
            .collect::<Vec<_>>();

        Ok(SeedResult { products_seeded })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for product in SEED_PRODUCTS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM product WHERE id = ?1 AND name = ?2 AND price = ?3)",
            )
            .bind(product.id)
            .bind(product.name)
            .bind(product.price)
            .fetch_one(pool)
            .await?;
            checks.push((product.name, present == 1));
        }

        let all_present = checks.iter().all(|(_, exists)| *exists);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedProductContract {
    id: i64,
    name: &'static str,
    price: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSeedInfo {
    pub id: i64,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedResult {
    pub products_seeded: Vec<ProductSeedInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
