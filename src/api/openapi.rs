//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    address_handler, admin_handler, auth_handler, cart_handler, product_handler,
};
use crate::domain::{
    AddressResponse, CartLineResponse, CartResponse, CartSummary, ProductResponse, UserResponse,
    UserRole,
};
use crate::services::TokenResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Merch API",
        version = "0.1.0",
        description = "Storefront backend: catalog, carts, addresses and admin email"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        auth_handler::signup,
        auth_handler::login,
        product_handler::home,
        product_handler::get_product,
        product_handler::search_products,
        cart_handler::get_cart,
        cart_handler::add_item,
        cart_handler::update_item,
        cart_handler::remove_item,
        cart_handler::get_cart_item,
        address_handler::list_addresses,
        address_handler::add_address,
        address_handler::remove_address,
        admin_handler::add_product,
        admin_handler::remove_product,
        admin_handler::list_users,
        admin_handler::broadcast,
        admin_handler::notify,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            ProductResponse,
            CartLineResponse,
            CartSummary,
            CartResponse,
            AddressResponse,
            TokenResponse,
            auth_handler::SignupRequest,
            auth_handler::LoginRequest,
            cart_handler::AddItemRequest,
            cart_handler::UpdateItemRequest,
            cart_handler::RemoveItemRequest,
            address_handler::AddressRequest,
            admin_handler::ProductRequest,
            admin_handler::BroadcastRequest,
            admin_handler::NotifyRequest,
            admin_handler::BroadcastResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup and login"),
        (name = "Catalog", description = "Product listing and search"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Addresses", description = "Shipping addresses"),
        (name = "Admin", description = "Catalog maintenance and customer email")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}
