// src/models.rs

pub mod catalog;
pub mod customer;
pub mod sales;
pub mod workflow;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationError;

// ---
// Validação Customizada compartilhada
// ---
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

/// Valores monetários vão para colunas NUMERIC(12,2): no máximo 2 casas decimais.
pub(crate) fn validate_cents(val: &Decimal) -> Result<(), ValidationError> {
    if val.normalize().scale() > 2 {
        let mut err = ValidationError::new("scale");
        err.add_param("max".into(), &2);
        err.message = Some("O valor aceita no máximo 2 casas decimais.".into());
        return Err(err);
    }
    Ok(())
}

/// Preços e descontos: não negativos e em centavos.
pub(crate) fn validate_money(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    validate_cents(val)
}

/// Campos anuláveis dos payloads de atualização: ausente fica `None`
/// (mantém o valor) e `null` explícito vira `Some(None)` (limpa a coluna).
/// Usar junto com `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Envelope padrão das respostas de sucesso: `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `?includeDeleted=true` nas rotas por id dos recursos com soft delete.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct IncludeDeletedQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn not_negative_accepts_zero_and_positive() {
        assert!(validate_not_negative(&dec!(0)).is_ok());
        assert!(validate_not_negative(&dec!(-0.00)).is_ok());
        assert!(validate_not_negative(&dec!(12.50)).is_ok());
        assert!(validate_not_negative(&dec!(-0.01)).is_err());
    }

    #[test]
    fn cents_rejects_more_than_two_decimals() {
        assert!(validate_cents(&dec!(0.01)).is_ok());
        assert!(validate_cents(&dec!(1.500)).is_ok());
        assert!(validate_cents(&dec!(7)).is_ok());
        assert!(validate_cents(&dec!(0.005)).is_err());
    }

    #[test]
    fn money_checks_sign_then_scale() {
        assert!(validate_money(&dec!(18.90)).is_ok());
        assert_eq!(validate_money(&dec!(-1)).unwrap_err().code, "range");
        assert_eq!(validate_money(&dec!(0.005)).unwrap_err().code, "scale");
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        barcode: Option<Option<String>>,
    }

    #[test]
    fn nullable_tells_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"barcode":null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"barcode":"789"}"#).unwrap();

        assert_eq!(absent.barcode, None);
        assert_eq!(null.barcode, Some(None));
        assert_eq!(value.barcode, Some(Some("789".to_string())));
    }
}
