// src/db/sales_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{PaymentStatus, Sale, SaleItem},
};

// Itens sempre saem com o nome do produto (JOIN).
const SALE_ITEM_SELECT: &str = r#"
    SELECT si.id, si.sale_id, si.product_id, p.name AS product_name,
           si.quantity, si.unit_price, si.discount_amount, si.final_amount, si.created_at
    FROM sale_items si
    JOIN products p ON p.id = si.product_id
"#;

#[derive(Clone, Default)]
pub struct SalesRepository;

impl SalesRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  VENDAS
    // =========================================================================

    pub async fn list_sales<'e, E>(&self, executor: E) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sales = sqlx::query_as::<_, Sale>("SELECT * FROM sales ORDER BY created_at DESC")
            .fetch_all(executor)
            .await?;
        Ok(sales)
    }

    pub async fn find_sale<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_sale<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        total_amount: Decimal,
        discount_amount: Decimal,
        final_amount: Decimal,
        payment_status: PaymentStatus,
        payment_method: &str,
        notes: Option<&str>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                customer_id, total_amount, discount_amount, final_amount,
                payment_status, payment_method, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(customer_id)
            .bind(total_amount)
            .bind(discount_amount)
            .bind(final_amount)
            .bind(payment_status)
            .bind(payment_method)
            .bind(notes)
            .fetch_one(executor)
            .await?;
        Ok(sale)
    }

    /// Só status e notas mudam depois da criação. `notes = None` mantém as notas atuais.
    pub async fn update_payment_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: PaymentStatus,
        notes: Option<&str>,
    ) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET payment_status = $2,
                notes = COALESCE($3, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(status)
            .bind(notes)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_sale_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
        discount_amount: Decimal,
        final_amount: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            WITH inserted AS (
                INSERT INTO sale_items (
                    sale_id, product_id, quantity, unit_price, discount_amount, final_amount
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT i.id, i.sale_id, i.product_id, p.name AS product_name,
                   i.quantity, i.unit_price, i.discount_amount, i.final_amount, i.created_at
            FROM inserted i
            JOIN products p ON p.id = i.product_id
            "#,
        )
            .bind(sale_id)
            .bind(product_id)
            .bind(quantity)
            .bind(unit_price)
            .bind(discount_amount)
            .bind(final_amount)
            .fetch_one(executor)
            .await?;
        Ok(item)
    }

    pub async fn list_sale_items<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{SALE_ITEM_SELECT} WHERE si.sale_id = $1 ORDER BY si.created_at, si.id");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }

    /// Itens de várias vendas de uma vez (listagem).
    pub async fn list_items_for_sales<'e, E>(&self, executor: E, sale_ids: &[Uuid]) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{SALE_ITEM_SELECT} WHERE si.sale_id = ANY($1) ORDER BY si.created_at, si.id");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_ids)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }
}
