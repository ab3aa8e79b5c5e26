//! Admin handlers. Mounted behind the admin session middleware.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewProduct, ProductResponse, UserResponse};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Cloak")]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "Hooded wool cloak")]
    pub description: String,
    #[validate(length(min = 1, message = "Image is required"))]
    #[schema(example = "img.png")]
    pub image: String,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    #[schema(example = 2999)]
    pub price_cents: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BroadcastRequest {
    #[validate(length(min = 1, message = "Subject is required"))]
    #[schema(example = "Winter sale")]
    pub subject: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NotifyRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BroadcastResponse {
    /// Number of email jobs queued
    pub queued: usize,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(add_product))
        .route("/products/:id", delete(remove_product))
        .route("/users", get(list_users))
        .route("/broadcast", post(broadcast))
        .route("/notify", post(notify))
}

#[utoipa::path(
    post,
    path = "/admin/products",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn add_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Created<ProductResponse>> {
    let input = NewProduct {
        name: payload.name,
        description: payload.description,
        image: payload.image,
        price_cents: payload.price_cents,
    };
    let product = state
        .catalog_service
        .add_product(current_user.user_id, input)
        .await?;

    Ok(Created(ProductResponse::from(product)))
}

/// Hard delete. Existing cart lines keep their snapshot.
#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product removed"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn remove_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .catalog_service
        .remove_product(current_user.user_id, id)
        .await?;

    Ok(Json(ApiResponse::message("Product removed")))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All registered accounts", body = Vec<UserResponse>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// Queue a marketing email to every account
#[utoipa::path(
    post,
    path = "/admin/broadcast",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = BroadcastRequest,
    responses(
        (status = 200, description = "Emails queued", body = BroadcastResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn broadcast(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BroadcastRequest>,
) -> AppResult<Json<ApiResponse<BroadcastResponse>>> {
    let queued = state
        .notification_service
        .broadcast(current_user.user_id, payload.subject, payload.body)
        .await?;

    Ok(Json(ApiResponse::with_message(
        BroadcastResponse { queued },
        "Broadcast queued",
    )))
}

/// Queue a transactional email to one account
#[utoipa::path(
    post,
    path = "/admin/notify",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Email queued"),
        (status = 404, description = "User not found")
    )
)]
pub async fn notify(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NotifyRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .notification_service
        .notify_user(
            current_user.user_id,
            payload.user_id,
            payload.subject,
            payload.body,
        )
        .await?;

    Ok(Json(ApiResponse::message("Email queued")))
}
