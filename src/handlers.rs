pub mod catalog;
pub mod customers;
pub mod sales;
pub mod workflows;
