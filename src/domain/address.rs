//! Shipping addresses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone)]
pub struct Address {
    pub id: i32,
    pub user_id: i32,
    pub house_no: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    /// Copied from the owner when the address was added
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub house_no: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: i32,
    pub house_no: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            house_no: address.house_no,
            street: address.street,
            city: address.city,
            postal_code: address.postal_code,
            phone_number: address.phone,
            created_at: address.created_at,
        }
    }
}
