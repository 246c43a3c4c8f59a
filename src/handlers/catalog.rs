// src/handlers/catalog.rs

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
        catalog::{
            Category, CategoryPayload, CreateProductPayload, Product, UpdateCategoryPayload,
            UpdateProductPayload,
        },
        DataResponse,
    },
};

// =============================================================================
//  CATEGORIAS
// =============================================================================

// GET /api/v1/categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "Lista de categorias", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.catalog_service.list_categories(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(categories))))
}

// POST /api/v1/categories
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Catalog",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 422, description = "Nome vazio ou já usado")
    )
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .create_category(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

// GET /api/v1/categories/{id}
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria", body = Category),
        (status = 404, description = "Categoria não encontrada")
    )
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let category = app_state.catalog_service.get_category(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(category))))
}

// PUT /api/v1/categories/{id}
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    request_body = UpdateCategoryPayload,
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    )
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .update_category(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(DataResponse::new(category))))
}

// DELETE /api/v1/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria removida"),
        (status = 404, description = "Categoria não encontrada")
    )
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_category(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  PRODUTOS
// =============================================================================

// GET /api/v1/products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Catalog",
    responses(
        (status = 200, description = "Lista de produtos", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.catalog_service.list_products(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(products))))
}

// POST /api/v1/products
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Catalog",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 422, description = "Campos inválidos, SKU/código de barras repetido ou categoria inexistente")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .create_product(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(product))))
}

// GET /api/v1/products/{id}
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.catalog_service.get_product(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(product))))
}

// PUT /api/v1/products/{id}
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Catalog",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .update_product(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(DataResponse::new(product))))
}

// DELETE /api/v1/products/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Produto presente em vendas")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_product(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
