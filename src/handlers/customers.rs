// src/handlers/customers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::JsonBody},
    config::AppState,
    models::{
        customer::{CreateCustomerPayload, Customer, UpdateCustomerPayload},
        DataResponse,
    },
};

// GET /api/v1/customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Customer>)
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.customer_service.list_customers(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(customers))))
}

// POST /api/v1/customers
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 422, description = "Campos inválidos ou e-mail já usado")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .create_customer(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(customer))))
}

// GET /api/v1/customers/{id}
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.customer_service.get_customer(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(customer))))
}

// PUT /api/v1/customers/{id}
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .update_customer(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(DataResponse::new(customer))))
}

// DELETE /api/v1/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente com vendas registradas")
    )
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.customer_service.delete_customer(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
