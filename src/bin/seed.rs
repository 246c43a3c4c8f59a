//! Popula o banco com dados de demonstração: categorias, produtos,
//! clientes, workflows (com etapas) e uma atribuição.
//!
//! Uso: cargo run --bin seed

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use pos_backoffice::{
    config::{AppState, Config},
    models::{
        catalog::{CategoryPayload, CreateProductPayload},
        customer::CreateCustomerPayload,
        workflow::{CreateAssignmentPayload, StepPayload, WorkflowPayload, WorkflowStatus},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = Config::from_env()?;
    let state = AppState::new(&config).await?;
    sqlx::migrate!().run(&state.db_pool).await?;

    info!("Criando categorias...");
    let mut categories = Vec::new();
    for (name, description) in [
        ("Bebidas", "Cafés, sucos e refrigerantes"),
        ("Padaria", "Pães e salgados"),
        ("Mercearia", "Itens secos e enlatados"),
    ] {
        let category = state
            .catalog_service
            .create_category(
                &state.db_pool,
                &CategoryPayload {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                },
            )
            .await?;
        categories.push(category);
    }

    info!("Criando produtos...");
    let products = [
        (0, "Café Torrado 500g", Decimal::new(1890, 2), 40, "BEB-001", Some("7891000100103")),
        (0, "Suco de Laranja 1L", Decimal::new(899, 2), 25, "BEB-002", None),
        (1, "Pão Francês (un.)", Decimal::new(75, 2), 200, "PAD-001", None),
        (1, "Pão de Queijo (un.)", Decimal::new(250, 2), 80, "PAD-002", None),
        (2, "Arroz Tipo 1 5kg", Decimal::new(2790, 2), 30, "MER-001", Some("7896006711117")),
        (2, "Feijão Carioca 1kg", Decimal::new(849, 2), 3, "MER-002", None),
    ];
    for (category, name, price, stock, sku, barcode) in products {
        state
            .catalog_service
            .create_product(
                &state.db_pool,
                &CreateProductPayload {
                    category_id: Some(categories[category].id),
                    name: name.to_string(),
                    description: None,
                    price: Some(price),
                    stock: Some(stock),
                    sku: sku.to_string(),
                    barcode: barcode.map(str::to_string),
                    active: Some(true),
                },
            )
            .await?;
    }

    info!("Criando clientes...");
    for (name, email, phone) in [
        ("Consumidor Final", "consumidor@pos.local", None),
        ("Ana Souza", "ana.souza@example.com", Some("(11) 98888-1234")),
        ("Bruno Lima", "bruno.lima@example.com", Some("(21) 97777-4321")),
    ] {
        state
            .customer_service
            .create_customer(
                &state.db_pool,
                &CreateCustomerPayload {
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: phone.map(str::to_string),
                    address: None,
                    active: Some(true),
                },
            )
            .await?;
    }

    info!("Criando workflows...");
    let step = |order: i32, name: &str, role: &str, days: i32| StepPayload {
        id: None,
        name: name.to_string(),
        description: None,
        step_order: Some(order),
        min_verifications: Some(1),
        verifier_role: role.to_string(),
        duration_days: Some(days),
    };

    let expenses = state
        .workflow_service
        .create_workflow(
            &state.db_pool,
            &WorkflowPayload {
                name: "Aprovação de Despesas".to_string(),
                description: Some("Despesas acima do limite do caixa".to_string()),
                created_by: "Financeiro".to_string(),
                created_on: NaiveDate::from_ymd_opt(2024, 3, 18),
                status: WorkflowStatus::Active,
                stage_count: Some(3),
                steps: Some(vec![
                    step(1, "Revisão do Supervisor", "Supervisor", 2),
                    step(2, "Conferência Financeira", "Analista Financeiro", 3),
                    step(3, "Aprovação da Diretoria", "Diretor", 5),
                ]),
            },
        )
        .await?;

    state
        .workflow_service
        .create_workflow(
            &state.db_pool,
            &WorkflowPayload {
                name: "Solicitação de Férias".to_string(),
                description: None,
                created_by: "RH".to_string(),
                created_on: NaiveDate::from_ymd_opt(2024, 3, 17),
                status: WorkflowStatus::Draft,
                stage_count: Some(2),
                steps: Some(vec![
                    step(1, "Aprovação do Gestor", "Gestor", 3),
                    step(2, "Validação do RH", "Analista de RH", 2),
                ]),
            },
        )
        .await?;

    state
        .workflow_service
        .create_assignment(
            &state.db_pool,
            expenses.workflow.id,
            &CreateAssignmentPayload {
                assigned_to: "Carla Mendes".to_string(),
                assigned_by: "Financeiro".to_string(),
                assigned_at: None,
                due_date: Some(Utc::now() + Duration::days(7)),
                status: None,
                notes: Some("Reembolso de viagem".to_string()),
            },
        )
        .await?;

    info!("✅ Seed concluído.");
    Ok(())
}
