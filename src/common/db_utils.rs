// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helper de Constraints: traduz violações do Postgres em erros de campo
// ---

/// Mapeia uma constraint do banco para (campo JSON, mensagem).
/// Os nomes seguem os CONSTRAINTs declarados nas migrações.
fn constraint_field(constraint: &str) -> Option<(&'static str, &'static str)> {
    let mapped = match constraint {
        "categories_name_key" => ("name", "Já existe uma categoria com este nome."),
        "products_sku_key" => ("sku", "Este SKU já está em uso."),
        "products_barcode_key" => ("barcode", "Este código de barras já está em uso."),
        "products_category_id_fkey" => ("categoryId", "A categoria informada não existe."),
        "customers_email_key" => ("email", "Este e-mail já está em uso."),
        _ => return None,
    };
    Some(mapped)
}

/// Converte um `sqlx::Error` em `AppError`:
/// - unique/foreign key conhecidos viram erro de validação (422) no campo certo;
/// - FK que impede um DELETE vira `InUse` (409);
/// - o resto segue como `DatabaseError`.
pub(crate) fn map_db_error(e: sqlx::Error, entity: &'static str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        let constraint = db_err.constraint().unwrap_or_default();

        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            if let Some((field, message)) = constraint_field(constraint) {
                return AppError::field(field, "invalid", message);
            }
        }

        // FK de outra tabela apontando para a linha que estamos apagando
        if db_err.is_foreign_key_violation() {
            return AppError::InUse(entity);
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_constraints_map_to_json_fields() {
        assert_eq!(constraint_field("products_sku_key").map(|c| c.0), Some("sku"));
        assert_eq!(constraint_field("customers_email_key").map(|c| c.0), Some("email"));
        assert_eq!(
            constraint_field("products_category_id_fkey").map(|c| c.0),
            Some("categoryId")
        );
        assert!(constraint_field("sale_items_product_id_fkey").is_none());
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = map_db_error(sqlx::Error::RowNotFound, "Produto");
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }
}
