//! Cart handlers. Every route acts on the caller's own cart.

use axum::{
    extract::{Extension, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CartItemChange, CartLineResponse, CartResponse};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddItemRequest {
    #[validate(length(min = 1, message = "Product id is required"))]
    #[schema(example = "prd5b0e6c4a-1f2d-4e3b-8a7c-9d0e1f2a3b4c")]
    pub product_id: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "black")]
    pub color: Option<String>,
    #[schema(example = "M")]
    pub size: Option<String>,
}

/// Quantity is a signed delta applied to the existing line
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub product_id: String,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RemoveItemRequest {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub product_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ItemQuery {
    pub product_id: String,
}

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/item", get(get_cart_item))
        .route("/additem", post(add_item))
        .route("/updateitem", put(update_item))
        .route("/removeitem", delete(remove_item))
}

/// Current cart contents
#[utoipa::path(
    get,
    path = "/carts/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart lines and totals", body = CartResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CartResponse>>> {
    let lines = state.cart_service.get_cart(current_user.user_id).await?;
    Ok(Json(ApiResponse::success(CartResponse::from(lines))))
}

/// Add a product to the cart, merging with an existing line
#[utoipa::path(
    post,
    path = "/carts/additem",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Resulting cart line", body = CartLineResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddItemRequest>,
) -> AppResult<Created<CartLineResponse>> {
    let change = CartItemChange {
        product_id: payload.product_id,
        quantity: payload.quantity,
        color: payload.color,
        size: payload.size,
    };
    let line = state
        .cart_service
        .add_to_cart(current_user.user_id, change)
        .await?;

    Ok(Created(CartLineResponse::from(line)))
}

/// Adjust quantity and variant of an existing line
#[utoipa::path(
    put,
    path = "/carts/updateitem",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated"),
        (status = 400, description = "Quantity would drop to zero or below"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let change = CartItemChange {
        product_id: payload.product_id,
        quantity: payload.quantity,
        color: payload.color,
        size: payload.size,
    };
    state
        .cart_service
        .update_cart_item(current_user.user_id, change)
        .await?;

    Ok(Json(ApiResponse::message("Item updated")))
}

/// Remove a line from the cart
#[utoipa::path(
    delete,
    path = "/carts/removeitem",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = RemoveItemRequest,
    responses(
        (status = 200, description = "Item removed"),
        (status = 404, description = "Product or item not found")
    )
)]
pub async fn remove_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RemoveItemRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .cart_service
        .remove_from_cart(current_user.user_id, payload.product_id)
        .await?;

    Ok(Json(ApiResponse::message("Item removed")))
}

/// Single cart line by product id
#[utoipa::path(
    get,
    path = "/carts/item",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(ItemQuery),
    responses(
        (status = 200, description = "Cart line", body = CartLineResponse),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_cart_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<ApiResponse<CartLineResponse>>> {
    let line = state
        .cart_service
        .get_cart_item(current_user.user_id, query.product_id)
        .await?;

    Ok(Json(ApiResponse::success(CartLineResponse::from(line))))
}
