// src/client/sale_draft.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use super::api::{ApiClient, ClientError};
use crate::models::{
    catalog::Product,
    sales::{CreateSalePayload, SaleDetail, SaleItemPayload},
};

pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub discount_amount: Decimal,
}

impl DraftLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A venda em montagem no caixa. Só existe no cliente até `complete`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    customer_id: Option<Uuid>,
    lines: Vec<DraftLine>,
    payment_method: String,
    notes: Option<String>,
}

impl Default for SaleDraft {
    fn default() -> Self {
        Self {
            customer_id: None,
            lines: Vec::new(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            notes: None,
        }
    }
}

impl SaleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn customer_id(&self) -> Option<Uuid> {
        self.customer_id
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Mesmo produto soma na linha existente. Quantidade 0 (ou menos) é ignorada.
    pub fn add_item(&mut self, product: &Product, quantity: i32) {
        if quantity <= 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(DraftLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
                discount_amount: Decimal::ZERO,
            }),
        }
    }

    pub fn remove_item(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Quantidade 0 (ou menos) tira a linha.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn set_customer(&mut self, customer_id: Uuid) {
        self.customer_id = Some(customer_id);
    }

    pub fn set_payment_method(&mut self, method: impl Into<String>) {
        self.payment_method = method.into();
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    pub fn set_discount(&mut self, product_id: Uuid, discount_amount: Decimal) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.discount_amount = discount_amount;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Σ preço × quantidade, antes dos descontos.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(DraftLine::subtotal).sum()
    }

    pub fn discount(&self) -> Decimal {
        self.lines.iter().map(|l| l.discount_amount).sum()
    }

    pub fn total(&self) -> Decimal {
        self.subtotal() - self.discount()
    }

    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn to_payload(&self) -> Result<CreateSalePayload, ClientError> {
        let customer_id = self
            .customer_id
            .ok_or(ClientError::InvalidDraft("Selecione um cliente antes de finalizar a venda."))?;
        if self.lines.is_empty() {
            return Err(ClientError::InvalidDraft("A venda precisa de pelo menos um item."));
        }

        Ok(CreateSalePayload {
            customer_id: Some(customer_id),
            items: self
                .lines
                .iter()
                .map(|l| SaleItemPayload {
                    product_id: Some(l.product_id),
                    quantity: Some(l.quantity),
                    discount_amount: l.discount_amount,
                })
                .collect(),
            payment_method: self.payment_method.clone(),
            notes: self.notes.clone(),
        })
    }

    /// Envia a venda; o rascunho só é limpo se o servidor aceitar.
    pub async fn complete(&mut self, api: &ApiClient) -> Result<SaleDetail, ClientError> {
        let payload = self.to_payload()?;
        let sale: SaleDetail = api.post("/sales", &payload).await?;
        self.reset();
        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(name: &str, price: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            category_id: None,
            name: name.into(),
            description: None,
            price,
            stock: 50,
            sku: format!("SKU-{name}"),
            barcode: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn same_product_merges_into_one_line() {
        let coffee = product("Café", dec!(18.90));
        let mut draft = SaleDraft::new();
        draft.add_item(&coffee, 1);
        draft.add_item(&coffee, 2);

        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.item_count(), 3);
        assert_eq!(draft.total(), dec!(56.70));
    }

    #[test]
    fn adding_zero_or_negative_quantity_changes_nothing() {
        let coffee = product("Café", dec!(18.90));
        let mut draft = SaleDraft::new();

        draft.add_item(&coffee, 0);
        draft.add_item(&coffee, -2);
        assert!(draft.lines().is_empty());

        draft.add_item(&coffee, 2);
        draft.add_item(&coffee, -5);
        assert_eq!(draft.item_count(), 2);
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let coffee = product("Café", dec!(18.90));
        let bread = product("Pão", dec!(0.75));
        let mut draft = SaleDraft::new();
        draft.add_item(&coffee, 1);
        draft.add_item(&bread, 4);

        draft.update_quantity(coffee.id, 0);
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].product_id, bread.id);

        draft.update_quantity(bread.id, 10);
        assert_eq!(draft.subtotal(), dec!(7.50));
    }

    #[test]
    fn discounts_reduce_the_total() {
        let coffee = product("Café", dec!(10.00));
        let mut draft = SaleDraft::new();
        draft.add_item(&coffee, 2);
        draft.set_discount(coffee.id, dec!(3.00));

        assert_eq!(draft.subtotal(), dec!(20.00));
        assert_eq!(draft.discount(), dec!(3.00));
        assert_eq!(draft.total(), dec!(17.00));
    }

    #[test]
    fn payload_requires_customer_and_items() {
        let coffee = product("Café", dec!(10.00));
        let mut draft = SaleDraft::new();
        assert!(matches!(draft.to_payload(), Err(ClientError::InvalidDraft(_))));

        draft.set_customer(Uuid::new_v4());
        assert!(matches!(draft.to_payload(), Err(ClientError::InvalidDraft(_))));

        draft.add_item(&coffee, 1);
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload.payment_method, "cash");
        assert_eq!(payload.items[0].quantity, Some(1));
    }

    #[test]
    fn reset_restores_defaults() {
        let coffee = product("Café", dec!(10.00));
        let mut draft = SaleDraft::new();
        draft.add_item(&coffee, 1);
        draft.set_customer(Uuid::new_v4());
        draft.set_payment_method("pix");

        draft.reset();
        assert_eq!(draft, SaleDraft::new());
        assert_eq!(draft.payment_method(), DEFAULT_PAYMENT_METHOD);
    }
}
