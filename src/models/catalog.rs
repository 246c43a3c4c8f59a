// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{nullable, validate_money};

// --- 1. Categorias ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Bebidas")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Produtos ---
// O estoque vive na própria linha do produto; a venda decrementa `stock`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    #[schema(example = "Café Torrado 500g")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 24.90)]
    pub price: Decimal,
    #[schema(example = 120)]
    pub stock: i32,
    #[schema(example = "CAF-500")]
    pub sku: String,
    #[schema(example = "7891234567890")]
    pub barcode: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub category_id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(
        required(message = "O campo 'price' é obrigatório."),
        custom(function = "validate_money")
    )]
    pub price: Option<Decimal>,

    #[validate(
        required(message = "O campo 'stock' é obrigatório."),
        range(min = 0, message = "O estoque não pode ser negativo.")
    )]
    pub stock: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "O SKU é obrigatório (máx. 100)."))]
    pub sku: String,

    #[validate(length(min = 1, max = 100, message = "Código de barras inválido (máx. 100)."))]
    pub barcode: Option<String>,

    pub active: Option<bool>,
}

/// Atualização parcial: campos ausentes mantêm o valor atual; `null`
/// limpa `categoryId`, `description` e `barcode`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,

    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[validate(custom(function = "validate_money"))]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock: Option<i32>,

    #[validate(length(min = 1, max = 100, message = "O SKU é obrigatório (máx. 100)."))]
    pub sku: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Código de barras inválido (máx. 100)."))]
    #[schema(value_type = Option<String>)]
    pub barcode: Option<Option<String>>,

    pub active: Option<bool>,
}
