//! Read-only catalog routes.
//!
//! - `GET /products?page=&size=&sort=`: one page of products
//! - `GET /products/{id}`: a single product, 404 when absent

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use storefront_core::config::PaginationConfig;
use storefront_core::domain::page::{Page, PageRequest, Sort};
use storefront_core::domain::product::{Product, ProductId};
use storefront_core::errors::{ApplicationError, DomainError};
use storefront_db::CatalogService;
use tracing::debug;

use crate::error::ApiError;

#[derive(Clone)]
pub struct ProductsState {
    catalog: CatalogService,
    pagination: PaginationConfig,
}

impl ProductsState {
    pub fn new(catalog: CatalogService, pagination: PaginationConfig) -> Self {
        Self { catalog, pagination }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

pub fn router(state: ProductsState) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .with_state(state)
}

/// Fills in defaults and caps the size. A zero size is passed on so the
/// store can reject it.
fn page_request(
    query: &ListProductsQuery,
    pagination: &PaginationConfig,
) -> Result<PageRequest, DomainError> {
    let size = query.size.unwrap_or(pagination.default_page_size).min(pagination.max_page_size);
    let sort = query
        .sort
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<Sort>)
        .transpose()?;

    Ok(PageRequest { page: query.page.unwrap_or(0), size, sort })
}

pub async fn list_products(
    State(state): State<ProductsState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Json<Page<Product>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let request = page_request(&query, &state.pagination)?;
    let page = state.catalog.list_products(&request).await?;

    debug!(
        event_name = "catalog.products.listed",
        page = request.page,
        size = request.size,
        returned = page.number_of_elements(),
        total = page.total_elements,
        "listed products"
    );
    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<ProductsState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let id = ProductId(id);
    match state.catalog.find_by_id(&id).await? {
        Some(product) => Ok(Json(product)),
        None => {
            debug!(event_name = "catalog.products.not_found", product_id = id.0, "product not found");
            Err(ApplicationError::NotFound { entity: "product", id: id.to_string() }.into())
        }
    }
}
