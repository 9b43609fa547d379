use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use storefront_core::domain::page::{Page, PageRequest, Sort, SortDirection, SortProperty};
use storefront_core::domain::product::{Product, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn order_by_clause(sort: Option<&Sort>) -> String {
    let Some(sort) = sort else {
        return "ORDER BY id ASC".to_string();
    };

    let column = match sort.property {
        SortProperty::Id => "id",
        SortProperty::Name => "name",
        SortProperty::Price => "CAST(price AS NUMERIC)",
        SortProperty::Quantity => "quantity",
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    if matches!(sort.property, SortProperty::Id) {
        format!("ORDER BY id {direction}")
    } else {
        format!("ORDER BY {column} {direction}, id ASC")
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let quantity: i32 =
        row.try_get("quantity").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_str: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let price = Decimal::from_str(&price_str).map_err(|e| {
        RepositoryError::Decode(format!("product {id} has invalid price `{price_str}`: {e}"))
    })?;

    Ok(Product { id: ProductId(id), name, description, quantity, price })
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_all(&self, request: &PageRequest) -> Result<Page<Product>, RepositoryError> {
        request.validate()?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product").fetch_one(&self.pool).await?;

        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT id, name, description, quantity, price FROM product {} LIMIT ? OFFSET ?",
            order_by_clause(request.sort.as_ref())
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(request.size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let content = rows.iter().map(row_to_product).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(content, request, u64::try_from(total).unwrap_or_default()))
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, description, quantity, price FROM product WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_product(r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO product (id, name, description, quantity, price)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 description = excluded.description,
                 quantity = excluded.quantity,
                 price = excluded.price",
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
