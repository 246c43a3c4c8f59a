// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

// O tipo de erro único da aplicação (repos, services e handlers).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("{entity} '{id}' não encontrado(a)")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Estoque insuficiente para o produto '{product}' (disponível: {available}, solicitado: {requested})")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },

    #[error("{0} está em uso e não pode ser removido(a)")]
    InUse(&'static str),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        AppError::NotFound { entity, id }
    }

    /// Erro de validação de um único campo, no mesmo formato do `validator`.
    pub fn field(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into().into());

        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }

    /// Erro num campo de um elemento de lista (`items[2].discountAmount`).
    pub fn list_field(
        list: &'static str,
        index: usize,
        field: &'static str,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into().into());

        let mut inner = ValidationErrors::new();
        inner.add(field, error);

        let mut errors = ValidationErrors::new();
        errors.errors_mut().insert(
            list.into(),
            ValidationErrorsKind::List(BTreeMap::from([(index, Box::new(inner))])),
        );
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. } | AppError::InUse(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Achata os erros do `validator` em `campo -> mensagens`.
/// Erros de listas aninhadas viram chaves como `items[0].quantity`.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut details = BTreeMap::new();
    collect_errors(errors, None, &mut details);
    details
}

fn collect_errors(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let key = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = out.entry(key).or_default();
                for e in field_errors {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(inner, Some(&key), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(inner, Some(&format!("{key}[{index}]")), out);
                }
            }
        }
    }
}

// Os nomes de campo do `validator` são os da struct Rust; a API fala camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::ValidationError(errors) => json!({
                "error": "Um ou mais campos são inválidos.",
                "details": flatten_validation_errors(errors),
            }),
            AppError::InvalidBody(rejection) => json!({ "error": rejection.body_text() }),

            // Os erros 500 não expõem detalhes; o `tracing` guarda a mensagem completa.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {}", self);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
