// src/services/catalog_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{
        Category, CategoryPayload, CreateProductPayload, Product, UpdateCategoryPayload,
        UpdateProductPayload,
    },
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_categories(executor).await
    }

    pub async fn get_category<'e, E>(&self, executor: E, id: Uuid) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_category(executor, id)
            .await?
            .ok_or_else(|| AppError::not_found("Categoria", id))
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .create_category(executor, &payload.name, payload.description.as_deref())
            .await
    }

    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateCategoryPayload,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update_category(
                executor,
                id,
                payload.name.as_deref(),
                payload.description.as_ref().map(Option::as_deref),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Categoria", id))
    }

    /// Produtos da categoria ficam sem categoria (ON DELETE SET NULL).
    pub async fn delete_category<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete_category(executor, id).await? {
            return Err(AppError::not_found("Categoria", id));
        }
        Ok(())
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_products(executor).await
    }

    pub async fn get_product<'e, E>(&self, executor: E, id: Uuid) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_product(executor, id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto", id))
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // price/stock são `required` no payload; o handler já validou.
        self.repo
            .create_product(
                executor,
                payload.category_id,
                &payload.name,
                payload.description.as_deref(),
                payload.price.unwrap_or_default(),
                payload.stock.unwrap_or_default(),
                &payload.sku,
                payload.barcode.as_deref(),
                payload.active.unwrap_or(true),
            )
            .await
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update_product(
                executor,
                id,
                payload.category_id,
                payload.name.as_deref(),
                payload.description.as_ref().map(Option::as_deref),
                payload.price,
                payload.stock,
                payload.sku.as_deref(),
                payload.barcode.as_ref().map(Option::as_deref),
                payload.active,
            )
            .await?
            .ok_or_else(|| AppError::not_found("Produto", id))
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete_product(executor, id).await? {
            return Err(AppError::not_found("Produto", id));
        }
        Ok(())
    }
}
