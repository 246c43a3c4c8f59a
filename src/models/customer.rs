// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "maria@email.com")]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(max = 20, message = "O telefone deve ter no máximo 20 caracteres."))]
    pub phone: Option<String>,

    pub address: Option<String>,

    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20, message = "O telefone deve ter no máximo 20 caracteres."))]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,

    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_must_be_valid() {
        let payload = CreateCustomerPayload {
            name: "João".into(),
            email: "joao-sem-arroba".into(),
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn phone_is_limited_to_twenty_chars() {
        let payload = UpdateCustomerPayload {
            phone: Some(Some("1".repeat(21))),
            ..Default::default()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn null_phone_clears_and_absent_keeps() {
        let clear: UpdateCustomerPayload =
            serde_json::from_value(serde_json::json!({ "phone": null })).unwrap();
        assert_eq!(clear.phone, Some(None));
        assert_eq!(clear.address, None);
        assert!(clear.validate().is_ok());
    }
}
