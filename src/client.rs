// src/client.rs
//
// Cliente tipado da API para o frontend: chamadas HTTP, caches de coleção
// e o rascunho da venda atual.

pub mod api;
pub mod sale_draft;
pub mod store;

pub use api::{ApiClient, ClientError};
pub use sale_draft::SaleDraft;
pub use store::{Resource, Store};
