//! Address book - per-user shipping addresses.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::validation::require;
use crate::domain::{Address, NewAddress};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::NewAddressRecord;
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[async_trait]
pub trait AddressService: Send + Sync {
    /// Store an address. The owner's phone number is copied onto it.
    async fn add_address(&self, user_id: String, input: NewAddress) -> AppResult<Address>;

    async fn list_addresses(&self, user_id: String) -> AppResult<Vec<Address>>;

    /// Remove one of the user's addresses. Addresses of other users are
    /// reported as missing.
    async fn remove_address(&self, user_id: String, address_id: i32) -> AppResult<()>;
}

pub struct AddressManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AddressManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AddressService for AddressManager<U> {
    async fn add_address(&self, user_id: String, input: NewAddress) -> AppResult<Address> {
        let house_no = require("House number", &input.house_no)?;
        let street = require("Street", &input.street)?;
        let city = require("City", &input.city)?;
        let postal_code = require("Postal code", &input.postal_code)?;

        with_transaction!(self.uow, |ctx| {
            let user = ctx
                .users()
                .find_by_user_id(&user_id)
                .await?
                .ok_or(AppError::UserNotFound)?;

            ctx.addresses()
                .create(NewAddressRecord {
                    user_id: user.id,
                    house_no,
                    street,
                    city,
                    postal_code,
                    phone: user.phone,
                })
                .await
        })
    }

    async fn list_addresses(&self, user_id: String) -> AppResult<Vec<Address>> {
        with_transaction!(self.uow, |ctx| {
            let user = ctx
                .users()
                .find_by_user_id(&user_id)
                .await?
                .ok_or(AppError::UserNotFound)?;
            ctx.addresses().list_for_user(user.id).await
        })
    }

    async fn remove_address(&self, user_id: String, address_id: i32) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            let user = ctx
                .users()
                .find_by_user_id(&user_id)
                .await?
                .ok_or(AppError::UserNotFound)?;
            if !ctx.addresses().delete_owned(user.id, address_id).await? {
                return Err(AppError::NotFound);
            }
            Ok(())
        })
    }
}
