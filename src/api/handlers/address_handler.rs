//! Address book handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{AddressResponse, NewAddress};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddressRequest {
    #[validate(length(min = 1, message = "House number is required"))]
    #[schema(example = "12B")]
    pub house_no: String,
    #[validate(length(min = 1, message = "Street is required"))]
    #[schema(example = "Baker Street")]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    #[schema(example = "London")]
    pub city: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    #[schema(example = "NW1 6XE")]
    pub postal_code: String,
}

pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(list_addresses).post(add_address))
        .route("/addresses/:id", delete(remove_address))
}

#[utoipa::path(
    get,
    path = "/users/addresses",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved addresses", body = Vec<AddressResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_addresses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<AddressResponse>>>> {
    let addresses = state
        .address_service
        .list_addresses(current_user.user_id)
        .await?;

    Ok(Json(ApiResponse::success(
        addresses.into_iter().map(AddressResponse::from).collect(),
    )))
}

/// Save a shipping address; the phone number is copied from the account
#[utoipa::path(
    post,
    path = "/users/addresses",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address saved", body = AddressResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn add_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddressRequest>,
) -> AppResult<Created<AddressResponse>> {
    let input = NewAddress {
        house_no: payload.house_no,
        street: payload.street,
        city: payload.city,
        postal_code: payload.postal_code,
    };
    let address = state
        .address_service
        .add_address(current_user.user_id, input)
        .await?;

    Ok(Created(AddressResponse::from(address)))
}

#[utoipa::path(
    delete,
    path = "/users/addresses/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Address id")),
    responses(
        (status = 200, description = "Address removed"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn remove_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .address_service
        .remove_address(current_user.user_id, id)
        .await?;

    Ok(Json(ApiResponse::message("Address removed")))
}
