// src/routes.rs

use axum::{
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

/// Todas as origens de `CORS_ALLOWED_ORIGIN` (separadas por vírgula);
/// sem configuração, qualquer origem.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origin
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn build_router(app_state: AppState, cors: CorsLayer) -> Router {
    let catalog_routes = Router::new()
        .route(
            "/categories",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::catalog::get_category)
                .put(handlers::catalog::update_category)
                .delete(handlers::catalog::delete_category),
        )
        .route(
            "/products",
            get(handlers::catalog::list_products).post(handlers::catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        );

    let customer_routes = Router::new()
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        );

    let sales_routes = Router::new()
        .route(
            "/sales",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route(
            "/sales/{id}",
            get(handlers::sales::get_sale).put(handlers::sales::update_payment_status),
        )
        .route("/sales/{id}/items", get(handlers::sales::list_sale_items));

    let workflow_routes = Router::new()
        .route(
            "/workflows",
            get(handlers::workflows::list_workflows).post(handlers::workflows::create_workflow),
        )
        .route(
            "/workflows/{id}",
            get(handlers::workflows::get_workflow)
                .put(handlers::workflows::update_workflow)
                .delete(handlers::workflows::delete_workflow),
        )
        .route(
            "/workflows/{workflow_id}/steps",
            get(handlers::workflows::list_steps).post(handlers::workflows::create_step),
        )
        .route(
            "/workflows/{workflow_id}/steps/{step_id}",
            get(handlers::workflows::get_step)
                .put(handlers::workflows::update_step)
                .delete(handlers::workflows::delete_step),
        )
        .route(
            "/workflows/{workflow_id}/assignments",
            get(handlers::workflows::list_assignments).post(handlers::workflows::create_assignment),
        )
        .route(
            "/workflows/{workflow_id}/assignments/{assignment_id}",
            get(handlers::workflows::get_assignment)
                .put(handlers::workflows::update_assignment)
                .delete(handlers::workflows::delete_assignment),
        );

    let api_v1 = Router::new()
        .merge(catalog_routes)
        .merge(customer_routes)
        .merge(sales_routes)
        .merge(workflow_routes);

    // Combina tudo no router principal
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/v1", api_v1)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
