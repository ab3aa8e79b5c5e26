//! Public catalog handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::AppState;
use crate::domain::ProductResponse;
use crate::errors::AppResult;
use crate::types::ApiResponse;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// Case-insensitive name fragment
    pub product_name: Option<String>,
}

/// Create catalog routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/products/catalog", get(search_products))
        .route("/products/:id", get(get_product))
}

/// Home page listing
#[utoipa::path(
    get,
    path = "/",
    tag = "Catalog",
    responses(
        (status = 200, description = "Up to 30 products, oldest first", body = Vec<ProductResponse>)
    )
)]
pub async fn home(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ProductResponse>>>> {
    let products = state.catalog_service.list_for_home().await?;
    Ok(Json(ApiResponse::success(
        products.into_iter().map(ProductResponse::from).collect(),
    )))
}

/// Get a product by its external id
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductResponse>>> {
    let product = state.catalog_service.get_product(id).await?;
    Ok(Json(ApiResponse::success(ProductResponse::from(product))))
}

/// Search products by name
#[utoipa::path(
    get,
    path = "/products/catalog",
    tag = "Catalog",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductResponse>),
        (status = 400, description = "Missing product name")
    )
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<Vec<ProductResponse>>>> {
    let products = state
        .catalog_service
        .search_by_name(query.product_name.unwrap_or_default())
        .await?;

    Ok(Json(ApiResponse::success(
        products.into_iter().map(ProductResponse::from).collect(),
    )))
}
