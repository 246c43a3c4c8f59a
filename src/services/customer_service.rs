// src/services/customer_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::customer::{CreateCustomerPayload, Customer, UpdateCustomerPayload},
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository) -> Self {
        Self { repo }
    }

    pub async fn list_customers<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_customers(executor).await
    }

    pub async fn get_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_customer(executor, id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente", id))
    }

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .create_customer(
                executor,
                &payload.name,
                &payload.email,
                payload.phone.as_deref(),
                payload.address.as_deref(),
                payload.active.unwrap_or(true),
            )
            .await
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update_customer(
                executor,
                id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_ref().map(Option::as_deref),
                payload.address.as_ref().map(Option::as_deref),
                payload.active,
            )
            .await?
            .ok_or_else(|| AppError::not_found("Cliente", id))
    }

    pub async fn delete_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete_customer(executor, id).await? {
            return Err(AppError::not_found("Cliente", id));
        }
        Ok(())
    }
}
