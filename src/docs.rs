// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "POS Back Office API", description = "Catálogo, clientes, vendas e workflows de aprovação"),
    paths(
        // --- Catalog ---
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::get_category,
        handlers::catalog::update_category,
        handlers::catalog::delete_category,
        handlers::catalog::list_products,
        handlers::catalog::create_product,
        handlers::catalog::get_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::create_sale,
        handlers::sales::get_sale,
        handlers::sales::update_payment_status,
        handlers::sales::list_sale_items,

        // --- Workflows ---
        handlers::workflows::list_workflows,
        handlers::workflows::create_workflow,
        handlers::workflows::get_workflow,
        handlers::workflows::update_workflow,
        handlers::workflows::delete_workflow,
        handlers::workflows::list_steps,
        handlers::workflows::create_step,
        handlers::workflows::get_step,
        handlers::workflows::update_step,
        handlers::workflows::delete_step,
        handlers::workflows::list_assignments,
        handlers::workflows::create_assignment,
        handlers::workflows::get_assignment,
        handlers::workflows::update_assignment,
        handlers::workflows::delete_assignment,
    ),
    components(
        schemas(
            // --- Catalog ---
            models::catalog::Category,
            models::catalog::Product,
            models::catalog::CategoryPayload,
            models::catalog::UpdateCategoryPayload,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,

            // --- Customers ---
            models::customer::Customer,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Sales ---
            models::sales::PaymentStatus,
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleDetail,
            models::sales::SaleItemPayload,
            models::sales::CreateSalePayload,
            models::sales::UpdatePaymentStatusPayload,

            // --- Workflows ---
            models::workflow::WorkflowStatus,
            models::workflow::AssignmentStatus,
            models::workflow::Workflow,
            models::workflow::WorkflowStep,
            models::workflow::WorkflowAssignment,
            models::workflow::WorkflowDetail,
            models::workflow::StepPayload,
            models::workflow::WorkflowPayload,
            models::workflow::CreateAssignmentPayload,
            models::workflow::UpdateAssignmentPayload,
        )
    ),
    tags(
        (name = "Catalog", description = "Categorias e Produtos"),
        (name = "Customers", description = "Cadastro de Clientes"),
        (name = "Sales", description = "Vendas e Baixa de Estoque"),
        (name = "Workflows", description = "Workflows de Aprovação, Etapas e Atribuições")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/categories/{id}",
            "/api/v1/products",
            "/api/v1/customers/{id}",
            "/api/v1/sales/{id}/items",
            "/api/v1/workflows/{workflow_id}/steps/{step_id}",
            "/api/v1/workflows/{workflow_id}/assignments",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "faltou {expected}");
        }
    }
}
