// src/db/workflow_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::workflow::{AssignmentStatus, Workflow, WorkflowAssignment, WorkflowStatus, WorkflowStep},
};

// Todas as tabelas de workflow usam soft delete (`deleted_at`).
// Listagens ignoram linhas apagadas; buscas por id aceitam `include_deleted`.
#[derive(Clone, Default)]
pub struct WorkflowRepository;

/// Campos de uma etapa já validados, prontos para gravar.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFields {
    pub name: String,
    pub description: Option<String>,
    pub step_order: i32,
    pub min_verifications: i32,
    pub verifier_role: String,
    pub duration_days: i32,
}

impl WorkflowRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  WORKFLOWS
    // =========================================================================

    pub async fn list_workflows<'e, E>(&self, executor: E) -> Result<Vec<Workflow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workflows = sqlx::query_as::<_, Workflow>(
            "SELECT * FROM workflows WHERE deleted_at IS NULL ORDER BY created_on DESC, name ASC",
        )
            .fetch_all(executor)
            .await?;
        Ok(workflows)
    }

    pub async fn find_workflow<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<Workflow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workflow = sqlx::query_as::<_, Workflow>(
            "SELECT * FROM workflows WHERE id = $1 AND ($2 OR deleted_at IS NULL)",
        )
            .bind(id)
            .bind(include_deleted)
            .fetch_optional(executor)
            .await?;
        Ok(workflow)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_workflow<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        created_by: &str,
        created_on: NaiveDate,
        status: WorkflowStatus,
        stage_count: i32,
    ) -> Result<Workflow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workflow = sqlx::query_as::<_, Workflow>(
            r#"
            INSERT INTO workflows (name, description, created_by, created_on, status, stage_count)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(name)
            .bind(description)
            .bind(created_by)
            .bind(created_on)
            .bind(status)
            .bind(stage_count)
            .fetch_one(executor)
            .await?;
        Ok(workflow)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_workflow<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        created_by: &str,
        created_on: NaiveDate,
        status: WorkflowStatus,
        stage_count: i32,
    ) -> Result<Option<Workflow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workflow = sqlx::query_as::<_, Workflow>(
            r#"
            UPDATE workflows
            SET name = $2, description = $3, created_by = $4, created_on = $5,
                status = $6, stage_count = $7, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(name)
            .bind(description)
            .bind(created_by)
            .bind(created_on)
            .bind(status)
            .bind(stage_count)
            .fetch_optional(executor)
            .await?;
        Ok(workflow)
    }

    pub async fn soft_delete_workflow<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE workflows SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ETAPAS
    // =========================================================================

    pub async fn list_steps<'e, E>(&self, executor: E, workflow_id: Uuid) -> Result<Vec<WorkflowStep>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let steps = sqlx::query_as::<_, WorkflowStep>(
            r#"
            SELECT * FROM workflow_steps
            WHERE workflow_id = $1 AND deleted_at IS NULL
            ORDER BY step_order ASC, created_at ASC
            "#,
        )
            .bind(workflow_id)
            .fetch_all(executor)
            .await?;
        Ok(steps)
    }

    pub async fn list_steps_for_workflows<'e, E>(
        &self,
        executor: E,
        workflow_ids: &[Uuid],
    ) -> Result<Vec<WorkflowStep>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let steps = sqlx::query_as::<_, WorkflowStep>(
            r#"
            SELECT * FROM workflow_steps
            WHERE workflow_id = ANY($1) AND deleted_at IS NULL
            ORDER BY step_order ASC, created_at ASC
            "#,
        )
            .bind(workflow_ids)
            .fetch_all(executor)
            .await?;
        Ok(steps)
    }

    pub async fn find_step<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        step_id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<WorkflowStep>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let step = sqlx::query_as::<_, WorkflowStep>(
            r#"
            SELECT * FROM workflow_steps
            WHERE id = $1 AND workflow_id = $2 AND ($3 OR deleted_at IS NULL)
            "#,
        )
            .bind(step_id)
            .bind(workflow_id)
            .bind(include_deleted)
            .fetch_optional(executor)
            .await?;
        Ok(step)
    }

    pub async fn create_step<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        fields: &StepFields,
    ) -> Result<WorkflowStep, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let step = sqlx::query_as::<_, WorkflowStep>(
            r#"
            INSERT INTO workflow_steps (
                workflow_id, name, description, step_order,
                min_verifications, verifier_role, duration_days
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(workflow_id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.step_order)
            .bind(fields.min_verifications)
            .bind(&fields.verifier_role)
            .bind(fields.duration_days)
            .fetch_one(executor)
            .await?;
        Ok(step)
    }

    pub async fn update_step<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        step_id: Uuid,
        fields: &StepFields,
    ) -> Result<Option<WorkflowStep>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let step = sqlx::query_as::<_, WorkflowStep>(
            r#"
            UPDATE workflow_steps
            SET name = $3, description = $4, step_order = $5,
                min_verifications = $6, verifier_role = $7, duration_days = $8,
                updated_at = NOW()
            WHERE id = $1 AND workflow_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
            .bind(step_id)
            .bind(workflow_id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.step_order)
            .bind(fields.min_verifications)
            .bind(&fields.verifier_role)
            .bind(fields.duration_days)
            .fetch_optional(executor)
            .await?;
        Ok(step)
    }

    pub async fn soft_delete_step<'e, E>(&self, executor: E, workflow_id: Uuid, step_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE workflow_steps SET deleted_at = NOW()
            WHERE id = $1 AND workflow_id = $2 AND deleted_at IS NULL
            "#,
        )
            .bind(step_id)
            .bind(workflow_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft delete em lote (etapas removidas na reconciliação).
    pub async fn soft_delete_steps<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        step_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE workflow_steps SET deleted_at = NOW()
            WHERE workflow_id = $1 AND id = ANY($2) AND deleted_at IS NULL
            "#,
        )
            .bind(workflow_id)
            .bind(step_ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  ATRIBUIÇÕES
    // =========================================================================

    pub async fn list_assignments<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
    ) -> Result<Vec<WorkflowAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignments = sqlx::query_as::<_, WorkflowAssignment>(
            r#"
            SELECT * FROM workflow_assignments
            WHERE workflow_id = $1 AND deleted_at IS NULL
            ORDER BY assigned_at DESC
            "#,
        )
            .bind(workflow_id)
            .fetch_all(executor)
            .await?;
        Ok(assignments)
    }

    pub async fn find_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        assignment_id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<WorkflowAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, WorkflowAssignment>(
            r#"
            SELECT * FROM workflow_assignments
            WHERE id = $1 AND workflow_id = $2 AND ($3 OR deleted_at IS NULL)
            "#,
        )
            .bind(assignment_id)
            .bind(workflow_id)
            .bind(include_deleted)
            .fetch_optional(executor)
            .await?;
        Ok(assignment)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        assigned_to: &str,
        assigned_by: &str,
        assigned_at: DateTime<Utc>,
        due_date: Option<DateTime<Utc>>,
        status: AssignmentStatus,
        notes: Option<&str>,
    ) -> Result<WorkflowAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, WorkflowAssignment>(
            r#"
            INSERT INTO workflow_assignments (
                workflow_id, assigned_to, assigned_by, assigned_at, due_date, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(workflow_id)
            .bind(assigned_to)
            .bind(assigned_by)
            .bind(assigned_at)
            .bind(due_date)
            .bind(status)
            .bind(notes)
            .fetch_one(executor)
            .await?;
        Ok(assignment)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        assignment_id: Uuid,
        assigned_to: Option<&str>,
        assigned_by: Option<&str>,
        assigned_at: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
        status: Option<AssignmentStatus>,
        notes: Option<&str>,
    ) -> Result<Option<WorkflowAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Sem máquina de estados: qualquer status pode ser gravado.
        let assignment = sqlx::query_as::<_, WorkflowAssignment>(
            r#"
            UPDATE workflow_assignments
            SET assigned_to = COALESCE($3, assigned_to),
                assigned_by = COALESCE($4, assigned_by),
                assigned_at = COALESCE($5, assigned_at),
                due_date = COALESCE($6, due_date),
                status = COALESCE($7, status),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE id = $1 AND workflow_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
            .bind(assignment_id)
            .bind(workflow_id)
            .bind(assigned_to)
            .bind(assigned_by)
            .bind(assigned_at)
            .bind(due_date)
            .bind(status)
            .bind(notes)
            .fetch_optional(executor)
            .await?;
        Ok(assignment)
    }

    pub async fn soft_delete_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        assignment_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE workflow_assignments SET deleted_at = NOW()
            WHERE id = $1 AND workflow_id = $2 AND deleted_at IS NULL
            "#,
        )
            .bind(assignment_id)
            .bind(workflow_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
