pub mod catalog;
pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use catalog::CatalogService;
pub use connection::{connect_with_config, connect_with_settings, DbPool};
pub use fixtures::{CatalogSeedDataset, ProductSeedInfo, SeedResult, VerificationResult};
pub use repositories::{
    InMemoryProductRepository, ProductRepository, RepositoryError, SqlProductRepository,
};
