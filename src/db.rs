pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod workflow_repo;
pub use workflow_repo::WorkflowRepository;
