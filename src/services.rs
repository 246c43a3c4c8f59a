pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod customer_service;
pub use customer_service::CustomerService;
pub mod sale_service;
pub use sale_service::SaleService;
pub mod workflow_service;
pub use workflow_service::WorkflowService;
