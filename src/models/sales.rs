// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{customer::Customer, validate_money};

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
}

// --- Venda (cabeçalho) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = 150.00)]
    pub total_amount: Decimal,
    #[schema(example = 10.00)]
    pub discount_amount: Decimal,
    #[schema(example = 140.00)]
    pub final_amount: Decimal,
    pub payment_status: PaymentStatus,
    #[schema(example = "cash")]
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Item da venda ---
// `unit_price` é o preço do produto no momento da venda.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    // Vem do JOIN com products
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub customer: Customer,
    pub items: Vec<SaleItem>,
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemPayload {
    #[validate(required(message = "O campo 'productId' é obrigatório."))]
    pub product_id: Option<Uuid>,

    #[validate(
        required(message = "O campo 'quantity' é obrigatório."),
        range(min = 1, message = "A quantidade mínima é 1.")
    )]
    #[schema(example = 2)]
    pub quantity: Option<i32>,

    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    #[schema(example = 0.0)]
    pub discount_amount: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    #[validate(required(message = "O campo 'customerId' é obrigatório."))]
    pub customer_id: Option<Uuid>,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "A venda precisa de pelo menos um item."),
        nested
    )]
    pub items: Vec<SaleItemPayload>,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "A forma de pagamento é obrigatória."))]
    #[schema(example = "cash")]
    pub payment_method: String,

    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusPayload {
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}
