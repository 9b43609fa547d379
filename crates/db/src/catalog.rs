use std::sync::Arc;

use storefront_core::domain::page::{Page, PageRequest};
use storefront_core::domain::product::{Product, ProductId};

use crate::repositories::{ProductRepository, RepositoryError};

/// Read-only product catalog backed by a [`ProductRepository`].
///
/// Both operations hand the request to the repository and return its answer
/// untouched, errors included. A missing product is `Ok(None)`.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn list_products(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        self.products.find_all(request).await
    }

    pub async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        self.products.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;

    use storefront_core::domain::page::{Page, PageRequest, Sort, SortProperty};
    use storefront_core::domain::product::{Product, ProductId};
    use storefront_core::errors::DomainError;

    use super::CatalogService;
    use crate::repositories::{InMemoryProductRepository, ProductRepository, RepositoryError};

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            description: String::new(),
            quantity: 1,
            price: Decimal::new(100, 2),
        }
    }

    /// Returns canned answers and records what it was asked.
    #[derive(Default)]
    struct RecordingRepository {
        page: Option<Page<Product>>,
        fail_with: Option<String>,
        page_requests: Mutex<Vec<PageRequest>>,
        lookups: Mutex<Vec<ProductId>>,
    }

    #[async_trait::async_trait]
    impl ProductRepository for RecordingRepository {
        async fn find_all(&self, request: &PageRequest) -> Result<Page<Product>, RepositoryError> {
            self.page_requests.lock().expect("requests lock").push(*request);
            if let Some(message) = &self.fail_with {
                return Err(RepositoryError::Decode(message.clone()));
            }
            Ok(self.page.clone().unwrap_or_else(|| Page::new(Vec::new(), request, 0)))
        }

        async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
            self.lookups.lock().expect("lookups lock").push(*id);
            if let Some(message) = &self.fail_with {
                return Err(RepositoryError::Decode(message.clone()));
            }
            Ok(None)
        }

        async fn save(&self, _product: Product) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn list_products_returns_repository_page_verbatim() {
        // deliberately inconsistent metadata: the service must not recompute it
        let fixture = Page {
            content: vec![product(9, "Z"), product(3, "C")],
            page: 4,
            size: 7,
            total_elements: 1234,
        };
        let repository =
            Arc::new(RecordingRepository { page: Some(fixture.clone()), ..Default::default() });
        let service = CatalogService::new(repository.clone());
        let request = PageRequest::sorted(0, 10, Sort::desc(SortProperty::Name));

        let page = service.list_products(&request).await.expect("list products");

        assert_eq!(page, fixture);
        assert_eq!(*repository.page_requests.lock().expect("requests lock"), vec![request]);
    }

    #[tokio::test]
    async fn find_by_id_forwards_identifier() {
        let repository = Arc::new(RecordingRepository::default());
        let service = CatalogService::new(repository.clone());

        let found = service.find_by_id(&ProductId(17)).await.expect("lookup");

        assert_eq!(found, None);
        assert_eq!(*repository.lookups.lock().expect("lookups lock"), vec![ProductId(17)]);
    }

    #[tokio::test]
    async fn repository_faults_propagate_unchanged() {
        let repository = Arc::new(RecordingRepository {
            fail_with: Some("storage unavailable".to_string()),
            ..Default::default()
        });
        let service = CatalogService::new(repository);

        let list_error =
            service.list_products(&PageRequest::new(0, 10)).await.expect_err("list should fail");
        let lookup_error = service.find_by_id(&ProductId(1)).await.expect_err("lookup should fail");

        assert!(matches!(list_error, RepositoryError::Decode(ref m) if m == "storage unavailable"));
        assert!(
            matches!(lookup_error, RepositoryError::Decode(ref m) if m == "storage unavailable")
        );
        assert_eq!(lookup_error.to_string(), "decode error: storage unavailable");
    }

    #[tokio::test]
    async fn invalid_page_is_the_repository_error() {
        let service = CatalogService::new(Arc::new(InMemoryProductRepository::default()));

        let error =
            service.list_products(&PageRequest::new(0, 0)).await.expect_err("size 0 should fail");

        assert!(matches!(
            error,
            RepositoryError::InvalidPage(DomainError::InvalidPageRequest(_))
        ));
    }

    #[tokio::test]
    async fn two_product_catalog_scenario() {
        let service = CatalogService::new(Arc::new(InMemoryProductRepository::with_products([
            product(1, "A"),
            product(2, "B"),
        ])));

        let page = service.list_products(&PageRequest::new(0, 10)).await.expect("list");
        assert_eq!(page.content, vec![product(1, "A"), product(2, "B")]);
        assert_eq!(page.total_elements, 2);

        let found = service.find_by_id(&ProductId(1)).await.expect("lookup 1");
        assert_eq!(found, Some(product(1, "A")));

        let missing = service.find_by_id(&ProductId(99)).await.expect("lookup 99");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn clones_share_the_repository() {
        let repository = Arc::new(InMemoryProductRepository::default());
        let service = CatalogService::new(repository.clone());
        let cloned = service.clone();

        repository.save(product(5, "E")).await.expect("save");

        let (left, right) =
            tokio::join!(service.find_by_id(&ProductId(5)), cloned.find_by_id(&ProductId(5)));
        assert_eq!(left.expect("left lookup"), Some(product(5, "E")));
        assert_eq!(right.expect("right lookup"), Some(product(5, "E")));
    }
}
