use std::cmp::Ordering;
use std::collections::BTreeMap;

use tokio::sync::RwLock;

use storefront_core::domain::page::{Page, PageRequest, Sort, SortDirection, SortProperty};
use storefront_core::domain::product::{Product, ProductId};

use super::{ProductRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<BTreeMap<i64, Product>>,
}

impl InMemoryProductRepository {
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products.into_iter().map(|product| (product.id.0, product)).collect();
        Self { products: RwLock::new(products) }
    }
}

fn compare(sort: &Sort, left: &Product, right: &Product) -> Ordering {
    let ordering = match sort.property {
        SortProperty::Id => left.id.cmp(&right.id),
        SortProperty::Name => left.name.cmp(&right.name),
        SortProperty::Price => left.price.cmp(&right.price),
        SortProperty::Quantity => left.quantity.cmp(&right.quantity),
    };
    let ordering = match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    // ties fall back to ascending id, matching the SQL store
    ordering.then_with(|| left.id.cmp(&right.id))
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self, request: &PageRequest) -> Result<Page<Product>, RepositoryError> {
        request.validate()?;

        let products = self.products.read().await;
        let total = products.len() as u64;

        let mut ordered: Vec<&Product> = products.values().collect();
        if let Some(sort) = &request.sort {
            ordered.sort_by(|left, right| compare(sort, left, right));
        }

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = ordered
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id.0).cloned())
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.insert(product.id.0, product);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use storefront_core::domain::page::{PageRequest, Sort, SortProperty};
    use storefront_core::domain::product::{Product, ProductId};

    use crate::repositories::{InMemoryProductRepository, ProductRepository, RepositoryError};

    fn product(id: i64, name: &str, quantity: i32, price_cents: i64) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            description: format!("{name} description"),
            quantity,
            price: Decimal::new(price_cents, 2),
        }
    }

    fn catalog() -> InMemoryProductRepository {
        InMemoryProductRepository::with_products([
            product(3, "Charger", 40, 1999),
            product(1, "Phone", 5, 49900),
            product(2, "Case", 40, 1250),
            product(4, "Headset", 0, 7900),
            product(5, "Cable", 100, 999),
        ])
    }

    #[tokio::test]
    async fn in_memory_product_repo_round_trip() {
        let repo = InMemoryProductRepository::default();
        let product = product(7, "Pro Plan", 1, 10000);

        repo.save(product.clone()).await.expect("save product");
        let found = repo.find_by_id(&product.id).await.expect("find product");

        assert_eq!(found, Some(product));
    }

    #[tokio::test]
    async fn missing_product_is_absent() {
        let found = catalog().find_by_id(&ProductId(99)).await.expect("lookup should succeed");
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn unsorted_pages_follow_id_order() {
        let repo = catalog();

        let first = repo.find_all(&PageRequest::new(0, 2)).await.expect("first page");
        let last = repo.find_all(&PageRequest::new(2, 2)).await.expect("last page");

        let ids = |page: &storefront_core::Page<Product>| {
            page.content.iter().map(|product| product.id.0).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), vec![1, 2]);
        assert_eq!(ids(&last), vec![5]);
        assert_eq!(first.total_elements, 5);
        assert_eq!(first.total_pages(), 3);
        assert!(last.is_last());
    }

    #[tokio::test]
    async fn sort_breaks_ties_by_id() {
        let page = catalog()
            .find_all(&PageRequest::sorted(0, 5, Sort::desc(SortProperty::Quantity)))
            .await
            .expect("sorted page");

        let ids = page.content.iter().map(|product| product.id.0).collect::<Vec<_>>();
        assert_eq!(ids, vec![5, 2, 3, 1, 4]);
    }

    #[tokio::test]
    async fn sort_by_price_ascending() {
        let page = catalog()
            .find_all(&PageRequest::sorted(0, 3, Sort::asc(SortProperty::Price)))
            .await
            .expect("sorted page");

        let names = page.content.iter().map(|product| product.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Cable", "Case", "Charger"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_but_keeps_total() {
        let page = catalog().find_all(&PageRequest::new(10, 2)).await.expect("page");

        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.page, 10);
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let error = catalog().find_all(&PageRequest::new(0, 0)).await.expect_err("size 0");
        assert!(matches!(error, RepositoryError::InvalidPage(_)));
    }
}
