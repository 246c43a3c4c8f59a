// src/models/workflow.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "workflow_status")]
pub enum WorkflowStatus {
    Active,
    Inactive,
    #[default]
    Draft,
}

// O ciclo esperado é Pending -> In Progress -> Completed | Rejected,
// mas qualquer status pode ser gravado diretamente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "assignment_status")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

// --- Workflow ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: Uuid,
    #[schema(example = "Aprovação de Despesas")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "Financeiro")]
    pub created_by: String,
    pub created_on: NaiveDate,
    pub status: WorkflowStatus,
    #[schema(example = 3)]
    pub stage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// --- Etapa ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: Uuid,
    pub workflow_id: Uuid,
    #[schema(example = "Revisão do Supervisor")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "order")]
    #[schema(example = 1)]
    pub step_order: i32,
    #[schema(example = 1)]
    pub min_verifications: i32,
    #[schema(example = "Supervisor Financeiro")]
    pub verifier_role: String,
    #[schema(example = 2)]
    pub duration_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// --- Atribuição ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAssignment {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub assigned_to: String,
    pub assigned_by: String,
    pub assigned_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDetail {
    #[serde(flatten)]
    pub workflow: Workflow,
    pub steps: Vec<WorkflowStep>,
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    /// Presente apenas na reconciliação (PUT do workflow): identifica a etapa existente.
    pub id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: String,

    pub description: Option<String>,

    #[serde(rename = "order")]
    #[validate(
        required(message = "O campo 'order' é obrigatório."),
        range(min = 1, message = "A ordem mínima é 1.")
    )]
    pub step_order: Option<i32>,

    #[validate(
        required(message = "O campo 'minVerifications' é obrigatório."),
        range(min = 1, message = "É necessária pelo menos 1 verificação.")
    )]
    pub min_verifications: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O verificador é obrigatório (máx. 255)."))]
    pub verifier_role: String,

    #[validate(
        required(message = "O campo 'durationDays' é obrigatório."),
        range(min = 1, message = "A duração mínima é 1 dia.")
    )]
    pub duration_days: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório (máx. 255)."))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O criador é obrigatório (máx. 255)."))]
    pub created_by: String,

    #[validate(required(message = "O campo 'createdOn' é obrigatório."))]
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-18")]
    pub created_on: Option<NaiveDate>,

    #[serde(default)]
    pub status: WorkflowStatus,

    #[validate(
        required(message = "O campo 'stageCount' é obrigatório."),
        range(min = 1, message = "O workflow precisa de pelo menos 1 etapa.")
    )]
    pub stage_count: Option<i32>,

    /// Na criação: etapas a inserir. Na atualização: lista reconciliada por id.
    #[validate(nested)]
    pub steps: Option<Vec<StepPayload>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O responsável é obrigatório (máx. 255)."))]
    pub assigned_to: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "O campo 'assignedBy' é obrigatório (máx. 255)."))]
    pub assigned_by: String,

    pub assigned_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentPayload {
    #[validate(length(min = 1, max = 255, message = "O responsável é obrigatório (máx. 255)."))]
    pub assigned_to: Option<String>,

    #[validate(length(min = 1, max = 255, message = "O campo 'assignedBy' é obrigatório (máx. 255)."))]
    pub assigned_by: Option<String>,

    pub assigned_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(order: i32) -> StepPayload {
        StepPayload {
            name: format!("Etapa {order}"),
            step_order: Some(order),
            min_verifications: Some(1),
            verifier_role: "Gerente".into(),
            duration_days: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn step_json_uses_order_key() {
        let payload: StepPayload = serde_json::from_value(json!({
            "name": "Revisão",
            "order": 2,
            "minVerifications": 1,
            "verifierRole": "Diretor",
            "durationDays": 1
        }))
        .unwrap();
        assert_eq!(payload.step_order, Some(2));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn invalid_nested_step_is_reported_with_index() {
        let payload = WorkflowPayload {
            name: "Compras".into(),
            created_by: "Admin".into(),
            created_on: NaiveDate::from_ymd_opt(2024, 3, 18),
            stage_count: Some(2),
            steps: Some(vec![step(1), StepPayload { min_verifications: Some(0), ..step(2) }]),
            ..Default::default()
        };
        let details = crate::common::error::flatten_validation_errors(&payload.validate().unwrap_err());
        assert!(details.contains_key("steps[1].minVerifications"));
        assert_eq!(details.len(), 1);
    }

    #[test]
    fn status_defaults_to_draft() {
        let payload: WorkflowPayload = serde_json::from_value(json!({
            "name": "Férias",
            "createdBy": "RH",
            "createdOn": "2024-03-17",
            "stageCount": 1
        }))
        .unwrap();
        assert_eq!(payload.status, WorkflowStatus::Draft);
        assert!(payload.steps.is_none());
    }

    #[test]
    fn assignment_status_in_progress_has_a_space() {
        assert_eq!(
            serde_json::to_value(AssignmentStatus::InProgress).unwrap(),
            json!("In Progress")
        );
        let parsed: AssignmentStatus = serde_json::from_value(json!("Rejected")).unwrap();
        assert_eq!(parsed, AssignmentStatus::Rejected);
    }
}
