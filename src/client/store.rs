// src/client/store.rs

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::api::{ApiClient, ClientError};
use crate::models::{
    catalog::{Category, Product},
    customer::Customer,
    workflow::WorkflowDetail,
};

/// Coleção REST com CRUD completo em `PATH` e `PATH/{id}`.
pub trait Resource: Clone + DeserializeOwned {
    const PATH: &'static str;

    fn id(&self) -> Uuid;
}

impl Resource for Category {
    const PATH: &'static str = "/categories";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Resource for Product {
    const PATH: &'static str = "/products";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Resource for Customer {
    const PATH: &'static str = "/customers";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Resource for WorkflowDetail {
    const PATH: &'static str = "/workflows";

    fn id(&self) -> Uuid {
        self.workflow.id
    }
}

/// Cache local de uma coleção, reconciliado a cada resposta do servidor.
#[derive(Debug, Clone)]
pub struct Store<R> {
    api: ApiClient,
    items: Vec<R>,
    loading: bool,
    error: Option<String>,
    last_fetched: Option<DateTime<Utc>>,
}

impl<R: Resource> Store<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
            loading: false,
            error: None,
            last_fetched: None,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched
    }

    pub fn find(&self, id: Uuid) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        self.loading = false;
        if let Err(e) = &result {
            tracing::warn!("Falha em {}: {}", R::PATH, e);
            self.error = Some(e.to_string());
        }
        result
    }

    /// Substitui a coleção inteira pela lista do servidor.
    pub async fn fetch_all(&mut self) -> Result<&[R], ClientError> {
        self.begin();
        let result = self.api.get::<Vec<R>>(R::PATH).await;
        let items = self.finish(result)?;

        self.items = items;
        self.last_fetched = Some(Utc::now());
        Ok(&self.items)
    }

    pub async fn create<B: Serialize + ?Sized>(&mut self, payload: &B) -> Result<R, ClientError> {
        self.begin();
        let result = self.api.post::<B, R>(R::PATH, payload).await;
        let created = self.finish(result)?;

        self.items.push(created.clone());
        Ok(created)
    }

    /// Troca o elemento de mesmo id pela versão devolvida pelo servidor.
    pub async fn update<B: Serialize + ?Sized>(&mut self, id: Uuid, payload: &B) -> Result<R, ClientError> {
        self.begin();
        let path = format!("{}/{}", R::PATH, id);
        let result = self.api.put::<B, R>(&path, payload).await;
        let updated = self.finish(result)?;

        if let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.begin();
        let path = format!("{}/{}", R::PATH, id);
        let result = self.api.delete(&path).await;
        self.finish(result)?;

        self.items.retain(|item| item.id() != id);
        Ok(())
    }
}
