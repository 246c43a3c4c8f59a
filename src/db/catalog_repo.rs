// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::catalog::{Category, Product},
};

// Repositório do catálogo: tabelas `categories` e `products`.
#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(categories)
    }

    pub async fn find_category<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
            .bind(name)
            .bind(description)
            .fetch_one(executor)
            .await
            .map_err(|e| map_db_error(e, "Categoria"))
    }

    /// Atualização parcial: `None` mantém o valor atual; `Some(None)` grava NULL.
    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(name)
            .bind(description.is_some())
            .bind(description.flatten())
            .fetch_optional(executor)
            .await
            .map_err(|e| map_db_error(e, "Categoria"))
    }

    /// Retorna `true` se uma linha foi apagada.
    pub async fn delete_category<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_db_error(e, "Categoria"))?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn find_product<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Trava (FOR UPDATE) os produtos da venda, sempre na ordem do id,
    /// para que vendas concorrentes não entrem em deadlock.
    pub async fn lock_products<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        category_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        stock: i32,
        sku: &str,
        barcode: Option<&str>,
        active: bool,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (category_id, name, description, price, stock, sku, barcode, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
            .bind(category_id)
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(stock)
            .bind(sku)
            .bind(barcode)
            .bind(active)
            .fetch_one(executor)
            .await
            .map_err(|e| map_db_error(e, "Produto"))
    }

    /// Campos anuláveis (`category_id`, `description`, `barcode`) chegam como
    /// `Option<Option<_>>`: `None` mantém, `Some(None)` limpa.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        category_id: Option<Option<Uuid>>,
        name: Option<&str>,
        description: Option<Option<&str>>,
        price: Option<Decimal>,
        stock: Option<i32>,
        sku: Option<&str>,
        barcode: Option<Option<&str>>,
        active: Option<bool>,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // A unicidade de sku/barcode é revalidada pelas constraints (excluindo a própria linha).
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET category_id = CASE WHEN $2 THEN $3 ELSE category_id END,
                name = COALESCE($4, name),
                description = CASE WHEN $5 THEN $6 ELSE description END,
                price = COALESCE($7, price),
                stock = COALESCE($8, stock),
                sku = COALESCE($9, sku),
                barcode = CASE WHEN $10 THEN $11 ELSE barcode END,
                active = COALESCE($12, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(category_id.is_some())
            .bind(category_id.flatten())
            .bind(name)
            .bind(description.is_some())
            .bind(description.flatten())
            .bind(price)
            .bind(stock)
            .bind(sku)
            .bind(barcode.is_some())
            .bind(barcode.flatten())
            .bind(active)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_db_error(e, "Produto"))
    }

    /// Baixa de estoque da venda. O CHECK (stock >= 0) segura qualquer corrida restante.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(product_id)
            .bind(quantity)
            .fetch_one(executor)
            .await?;
        Ok(product)
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_db_error(e, "Produto"))?;
        Ok(result.rows_affected() > 0)
    }
}
