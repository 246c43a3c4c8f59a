// src/services/sale_service.rs

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CustomerRepository, SalesRepository},
    models::{
        catalog::Product,
        sales::{CreateSalePayload, PaymentStatus, Sale, SaleDetail, SaleItem},
    },
};

// ---
// Cotação: cálculo puro, sem banco
// ---

/// Uma linha pedida pelo caixa.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    pub discount_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuotedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleQuote {
    pub lines: Vec<QuotedLine>,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    /// Quantidade total a baixar por produto (linhas repetidas somadas).
    pub stock_deductions: BTreeMap<Uuid, i32>,
}

impl SaleLineRequest {
    /// Linhas do payload já validado (product_id e quantity são `required`).
    pub fn from_payload(payload: &CreateSalePayload) -> Vec<Self> {
        payload
            .items
            .iter()
            .map(|item| Self {
                product_id: item.product_id.unwrap_or_default(),
                quantity: item.quantity.unwrap_or_default(),
                discount_amount: item.discount_amount,
            })
            .collect()
    }
}

/// Calcula os valores da venda com os preços atuais e confere o estoque
/// contra a quantidade somada de cada produto.
pub fn quote_sale(
    lines: &[SaleLineRequest],
    products: &HashMap<Uuid, Product>,
) -> Result<SaleQuote, AppError> {
    let mut quoted = Vec::with_capacity(lines.len());
    let mut stock_deductions: BTreeMap<Uuid, i32> = BTreeMap::new();
    let mut total_amount = Decimal::ZERO;
    let mut discount_amount = Decimal::ZERO;

    for (index, line) in lines.iter().enumerate() {
        let product = products
            .get(&line.product_id)
            .ok_or_else(|| AppError::not_found("Produto", line.product_id))?;

        if line.quantity < 1 {
            return Err(AppError::list_field(
                "items",
                index,
                "quantity",
                "range",
                "A quantidade mínima é 1.",
            ));
        }

        let subtotal = product.price * Decimal::from(line.quantity);
        if line.discount_amount.is_sign_negative() && !line.discount_amount.is_zero() {
            return Err(AppError::list_field(
                "items",
                index,
                "discountAmount",
                "range",
                "O desconto não pode ser negativo.",
            ));
        }
        if line.discount_amount.normalize().scale() > 2 {
            return Err(AppError::list_field(
                "items",
                index,
                "discountAmount",
                "scale",
                "O desconto aceita no máximo 2 casas decimais.",
            ));
        }
        if line.discount_amount > subtotal {
            return Err(AppError::list_field(
                "items",
                index,
                "discountAmount",
                "range",
                format!("O desconto não pode ser maior que o subtotal do item ({subtotal})."),
            ));
        }

        let requested = stock_deductions.entry(product.id).or_insert(0);
        *requested = requested.saturating_add(line.quantity);

        total_amount += subtotal;
        discount_amount += line.discount_amount;
        quoted.push(QuotedLine {
            product_id: product.id,
            quantity: line.quantity,
            unit_price: product.price,
            discount_amount: line.discount_amount,
            final_amount: subtotal - line.discount_amount,
        });
    }

    for (product_id, requested) in &stock_deductions {
        if let Some(product) = products.get(product_id) {
            if product.stock < *requested {
                return Err(AppError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock,
                    requested: *requested,
                });
            }
        }
    }

    Ok(SaleQuote {
        lines: quoted,
        total_amount,
        discount_amount,
        final_amount: total_amount - discount_amount,
        stock_deductions,
    })
}

// ---
// Serviço
// ---

#[derive(Clone)]
pub struct SaleService {
    sales_repo: SalesRepository,
    catalog_repo: CatalogRepository,
    customer_repo: CustomerRepository,
}

impl SaleService {
    pub fn new(
        sales_repo: SalesRepository,
        catalog_repo: CatalogRepository,
        customer_repo: CustomerRepository,
    ) -> Self {
        Self { sales_repo, catalog_repo, customer_repo }
    }

    /// Cria a venda numa única transação: trava os produtos, confere estoque,
    /// grava venda + itens e dá baixa no estoque. Qualquer erro desfaz tudo.
    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        lines: &[SaleLineRequest],
        payment_method: &str,
        notes: Option<&str>,
    ) -> Result<SaleDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let customer = self
            .customer_repo
            .find_customer(&mut *tx, customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente", customer_id))?;

        let mut product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        product_ids.sort();
        product_ids.dedup();

        // 1. Trava as linhas dos produtos (ordem do id)
        let products: HashMap<Uuid, Product> = self
            .catalog_repo
            .lock_products(&mut *tx, &product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        // 2. Cotação + checagem de estoque
        let quote = quote_sale(lines, &products).inspect_err(|e| {
            warn!("Venda recusada para o cliente {}: {}", customer_id, e);
        })?;

        // 3. Venda
        let sale = self
            .sales_repo
            .insert_sale(
                &mut *tx,
                customer.id,
                quote.total_amount,
                quote.discount_amount,
                quote.final_amount,
                PaymentStatus::Completed,
                payment_method,
                notes,
            )
            .await?;

        // 4. Itens com o preço do momento
        let mut items = Vec::with_capacity(quote.lines.len());
        for line in &quote.lines {
            let item = self
                .sales_repo
                .insert_sale_item(
                    &mut *tx,
                    sale.id,
                    line.product_id,
                    line.quantity,
                    line.unit_price,
                    line.discount_amount,
                    line.final_amount,
                )
                .await?;
            items.push(item);
        }

        // 5. Baixa de estoque
        for (product_id, quantity) in &quote.stock_deductions {
            self.catalog_repo
                .decrement_stock(&mut *tx, *product_id, *quantity)
                .await?;
        }

        tx.commit().await?;

        info!(
            "🧾 Venda {} registrada: {} itens, total final {}",
            sale.id,
            items.len(),
            sale.final_amount
        );
        Ok(SaleDetail { sale, customer, items })
    }

    /// Qualquer status pode ir para qualquer status; estoque e totais não mudam.
    pub async fn update_payment_status<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        status: PaymentStatus,
        notes: Option<&str>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = self
            .sales_repo
            .update_payment_status(executor, sale_id, status, notes)
            .await?
            .ok_or_else(|| AppError::not_found("Venda", sale_id))?;

        info!("Venda {} agora com pagamento {:?}", sale.id, sale.payment_status);
        Ok(sale)
    }

    pub async fn list_sales<'e, E>(&self, executor: E) -> Result<Vec<SaleDetail>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let sales = self.sales_repo.list_sales(&mut *conn).await?;
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let sale_ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let mut customer_ids: Vec<Uuid> = sales.iter().map(|s| s.customer_id).collect();
        customer_ids.sort();
        customer_ids.dedup();

        let mut items_by_sale: HashMap<Uuid, Vec<SaleItem>> = HashMap::new();
        for item in self.sales_repo.list_items_for_sales(&mut *conn, &sale_ids).await? {
            items_by_sale.entry(item.sale_id).or_default().push(item);
        }

        let customers: HashMap<Uuid, _> = self
            .customer_repo
            .find_customers_by_ids(&mut *conn, &customer_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        sales
            .into_iter()
            .map(|sale| {
                let customer = customers
                    .get(&sale.customer_id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Cliente", sale.customer_id))?;
                let items = items_by_sale.remove(&sale.id).unwrap_or_default();
                Ok(SaleDetail { sale, customer, items })
            })
            .collect()
    }

    pub async fn get_sale<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<SaleDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let sale = self
            .sales_repo
            .find_sale(&mut *conn, sale_id)
            .await?
            .ok_or_else(|| AppError::not_found("Venda", sale_id))?;
        let customer = self
            .customer_repo
            .find_customer(&mut *conn, sale.customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente", sale.customer_id))?;
        let items = self.sales_repo.list_sale_items(&mut *conn, sale.id).await?;

        Ok(SaleDetail { sale, customer, items })
    }

    pub async fn list_sale_items<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<SaleItem>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        if self.sales_repo.find_sale(&mut *conn, sale_id).await?.is_none() {
            return Err(AppError::not_found("Venda", sale_id));
        }
        self.sales_repo.list_sale_items(&mut *conn, sale_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(name: &str, price: Decimal, stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            category_id: None,
            name: name.into(),
            description: None,
            price,
            stock,
            sku: format!("SKU-{name}"),
            barcode: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog(products: &[&Product]) -> HashMap<Uuid, Product> {
        products.iter().map(|p| (p.id, (*p).clone())).collect()
    }

    fn line(product: &Product, quantity: i32, discount: Decimal) -> SaleLineRequest {
        SaleLineRequest { product_id: product.id, quantity, discount_amount: discount }
    }

    #[test]
    fn totals_add_up_across_lines() {
        let coffee = product("Café", dec!(18.90), 10);
        let bread = product("Pão", dec!(0.75), 100);
        let products = catalog(&[&coffee, &bread]);

        let quote = quote_sale(
            &[line(&coffee, 2, dec!(1.80)), line(&bread, 10, dec!(0))],
            &products,
        )
        .unwrap();

        assert_eq!(quote.total_amount, dec!(45.30));
        assert_eq!(quote.discount_amount, dec!(1.80));
        assert_eq!(quote.final_amount, dec!(43.50));
        assert_eq!(quote.lines[0].final_amount, dec!(36.00));
        assert_eq!(quote.lines[1].unit_price, dec!(0.75));

        let sum: Decimal = quote.lines.iter().map(|l| l.final_amount).sum();
        assert_eq!(sum, quote.final_amount);
        assert_eq!(quote.final_amount, quote.total_amount - quote.discount_amount);
    }

    #[test]
    fn quantity_above_stock_is_rejected() {
        let coffee = product("Café", dec!(18.90), 5);
        let products = catalog(&[&coffee]);

        let err = quote_sale(&[line(&coffee, 6, dec!(0))], &products).unwrap_err();
        match err {
            AppError::InsufficientStock { product, available, requested } => {
                assert_eq!(product, "Café");
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn repeated_product_lines_are_checked_combined() {
        let coffee = product("Café", dec!(18.90), 5);
        let products = catalog(&[&coffee]);

        let err = quote_sale(
            &[line(&coffee, 3, dec!(0)), line(&coffee, 3, dec!(0))],
            &products,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { requested: 6, .. }));

        let quote = quote_sale(
            &[line(&coffee, 2, dec!(0)), line(&coffee, 3, dec!(0))],
            &products,
        )
        .unwrap();
        assert_eq!(quote.stock_deductions[&coffee.id], 5);
        assert_eq!(quote.lines.len(), 2);
    }

    #[test]
    fn discount_above_line_subtotal_is_a_validation_error() {
        let bread = product("Pão", dec!(0.75), 100);
        let products = catalog(&[&bread]);

        let err = quote_sale(
            &[line(&bread, 1, dec!(0)), line(&bread, 2, dec!(1.51))],
            &products,
        )
        .unwrap_err();
        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        let details = crate::common::error::flatten_validation_errors(&errors);
        assert!(details.contains_key("items[1].discountAmount"));

        // desconto igual ao subtotal zera a linha
        let quote = quote_sale(&[line(&bread, 2, dec!(1.50))], &products).unwrap();
        assert_eq!(quote.final_amount, dec!(0));
    }

    #[test]
    fn fractional_cent_discount_is_rejected() {
        let one = product("Bala", dec!(1.00), 10);
        let two = product("Chiclete", dec!(1.00), 10);
        let products = catalog(&[&one, &two]);

        let err = quote_sale(
            &[line(&one, 1, dec!(0.005)), line(&two, 1, dec!(0.005))],
            &products,
        )
        .unwrap_err();
        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        let details = crate::common::error::flatten_validation_errors(&errors);
        assert!(details.contains_key("items[0].discountAmount"));

        // centavos inteiros fecham: soma das linhas == total da venda
        let quote = quote_sale(
            &[line(&one, 1, dec!(0.01)), line(&two, 1, dec!(0.010))],
            &products,
        )
        .unwrap();
        let sum: Decimal = quote.lines.iter().map(|l| l.final_amount).sum();
        assert_eq!(sum, quote.final_amount);
        assert_eq!(quote.final_amount, dec!(1.98));
    }

    #[test]
    fn unknown_product_is_not_found() {
        let coffee = product("Café", dec!(18.90), 5);
        let ghost = product("Fantasma", dec!(1), 1);
        let products = catalog(&[&coffee]);

        let err = quote_sale(&[line(&ghost, 1, dec!(0))], &products).unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Produto", .. }));
    }

    #[test]
    fn payload_lines_keep_order_and_discounts() {
        let product_id = Uuid::new_v4();
        let payload = CreateSalePayload {
            customer_id: Some(Uuid::new_v4()),
            items: vec![crate::models::sales::SaleItemPayload {
                product_id: Some(product_id),
                quantity: Some(4),
                discount_amount: dec!(2.5),
            }],
            payment_method: "cash".into(),
            notes: None,
        };
        let lines = SaleLineRequest::from_payload(&payload);
        assert_eq!(lines, vec![SaleLineRequest { product_id, quantity: 4, discount_amount: dec!(2.5) }]);
    }
}
