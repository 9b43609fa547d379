use async_trait::async_trait;
use thiserror::Error;

use storefront_core::domain::page::{Page, PageRequest};
use storefront_core::domain::product::{Product, ProductId};
use storefront_core::errors::{ApplicationError, DomainError};

pub mod memory;
pub mod product;

pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    InvalidPage(#[from] DomainError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::InvalidPage(error) => Self::Domain(error),
            other => Self::Persistence(other.to_string()),
        }
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Returns one page of products. Implementations reject requests that
    /// fail [`PageRequest::validate`] with [`RepositoryError::InvalidPage`].
    async fn find_all(&self, request: &PageRequest) -> Result<Page<Product>, RepositoryError>;
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
}
