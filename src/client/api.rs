// src/client/api.rs

use std::{collections::BTreeMap, time::Duration};

use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Falha de comunicação com a API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api {
        status: StatusCode,
        message: String,
        details: BTreeMap<String, Vec<String>>,
    },

    #[error("{0}")]
    InvalidDraft(&'static str),
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: BTreeMap<String, Vec<String>>,
}

/// Cliente HTTP da API `/api/v1`. Desembrulha o envelope `{"data": ...}`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent("pos-backoffice-client/0.1")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.endpoint(path)).send().await?;
        read_data(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.endpoint(path)).json(body).send().await?;
        read_data(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.put(self.endpoint(path)).json(body).send().await?;
        read_data(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.client.delete(self.endpoint(path)).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let envelope = response.json::<Envelope<T>>().await?;
    Ok(envelope.data)
}

// Corpo `{"error", "details"}` da API; qualquer outra coisa vira texto cru.
async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let body_text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&body_text) {
        Ok(body) => ClientError::Api {
            status,
            message: body.error,
            details: body.details,
        },
        Err(_) => ClientError::Api {
            status,
            message: if body_text.is_empty() {
                status.canonical_reason().unwrap_or("Erro").to_string()
            } else {
                body_text
            },
            details: BTreeMap::new(),
        },
    }
}
