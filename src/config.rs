// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CatalogRepository, CustomerRepository, SalesRepository, WorkflowRepository},
    services::{CatalogService, CustomerService, SaleService, WorkflowService},
};

// ---
// Configuração (variáveis de ambiente / .env)
// ---
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// `None` libera qualquer origem.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        Ok(Self {
            database_url,
            host: env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("APP_PORT", 3000)?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            acquire_timeout: Duration::from_secs(parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 3)?),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok().filter(|v| !v.is_empty()),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} inválida: '{raw}'")),
        Err(_) => Ok(default),
    }
}

// ---
// Estado compartilhado pelos handlers
// ---
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub catalog_service: CatalogService,
    pub customer_service: CustomerService,
    pub sale_service: SaleService,
    pub workflow_service: WorkflowService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool) -> Self {
        let catalog_repo = CatalogRepository::new();
        let customer_repo = CustomerRepository::new();
        let sales_repo = SalesRepository::new();
        let workflow_repo = WorkflowRepository::new();

        Self {
            db_pool,
            catalog_service: CatalogService::new(catalog_repo.clone()),
            customer_service: CustomerService::new(customer_repo.clone()),
            sale_service: SaleService::new(sales_repo, catalog_repo, customer_repo),
            workflow_service: WorkflowService::new(workflow_repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default() {
        let port: u16 = parse_var("POS_TEST_UNSET_PORT_VAR", 3000).unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn addr_joins_host_and_port() {
        let config = Config {
            database_url: "postgres://localhost/pos".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(3),
            cors_allowed_origin: None,
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }
}
