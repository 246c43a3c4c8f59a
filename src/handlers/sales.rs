// src/handlers/sales.rs

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
        sales::{CreateSalePayload, Sale, SaleDetail, SaleItem, UpdatePaymentStatusPayload},
        DataResponse,
    },
    services::sale_service::SaleLineRequest,
};

// GET /api/v1/sales
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Vendas (mais recentes primeiro), com cliente e itens", body = Vec<SaleDetail>)
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list_sales(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(sales))))
}

// POST /api/v1/sales
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada e estoque baixado", body = SaleDetail),
        (status = 404, description = "Cliente ou produto inexistente"),
        (status = 409, description = "Estoque insuficiente"),
        (status = 422, description = "Itens inválidos ou desconto acima do subtotal")
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer_id = payload.customer_id.unwrap_or_default();
    let lines = SaleLineRequest::from_payload(&payload);

    let sale = app_state
        .sale_service
        .create_sale(
            &app_state.db_pool,
            customer_id,
            &lines,
            &payload.payment_method,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(sale))))
}

// GET /api/v1/sales/{id}
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com cliente e itens", body = SaleDetail),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.get_sale(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(sale))))
}

// PUT /api/v1/sales/{id}
#[utoipa::path(
    put,
    path = "/api/v1/sales/{id}",
    tag = "Sales",
    request_body = UpdatePaymentStatusPayload,
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Status de pagamento atualizado", body = Sale),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn update_payment_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdatePaymentStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state
        .sale_service
        .update_payment_status(&app_state.db_pool, id, payload.payment_status, payload.notes.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(DataResponse::new(sale))))
}

// GET /api/v1/sales/{id}/items
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}/items",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Itens da venda", body = Vec<SaleItem>),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn list_sale_items(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.sale_service.list_sale_items(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(items))))
}
