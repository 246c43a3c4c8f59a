// src/services/workflow_service.rs

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sqlx::{Acquire, Executor, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{workflow_repo::StepFields, WorkflowRepository},
    models::workflow::{
        CreateAssignmentPayload, StepPayload, UpdateAssignmentPayload, Workflow, WorkflowAssignment,
        WorkflowDetail, WorkflowPayload, WorkflowStep,
    },
};

/// Campo `required` do validator. Só falha se o payload pulou o `validate()`.
fn required<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::field(field, "required", format!("O campo '{field}' é obrigatório.")))
}

impl TryFrom<&StepPayload> for StepFields {
    type Error = AppError;

    fn try_from(payload: &StepPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            name: payload.name.clone(),
            description: payload.description.clone(),
            step_order: required(payload.step_order, "order")?,
            min_verifications: required(payload.min_verifications, "minVerifications")?,
            verifier_role: payload.verifier_role.clone(),
            duration_days: required(payload.duration_days, "durationDays")?,
        })
    }
}

// ---
// Reconciliação de etapas
// ---

/// O que fazer com as etapas de um workflow numa atualização.
#[derive(Debug, Default, PartialEq)]
pub struct StepSyncPlan {
    pub updates: Vec<(Uuid, StepFields)>,
    pub creates: Vec<StepFields>,
    pub deletes: Vec<Uuid>,
}

/// Compara as etapas vivas (`existing`) com a lista recebida:
/// com id existente atualiza, sem id cria, e as que sumiram da lista são apagadas.
/// Um id que não é etapa viva deste workflow (ou repetido) é erro de validação.
pub fn plan_step_sync(existing: &[Uuid], incoming: &[StepPayload]) -> Result<StepSyncPlan, AppError> {
    let live: HashSet<Uuid> = existing.iter().copied().collect();
    let mut kept: HashSet<Uuid> = HashSet::new();
    let mut plan = StepSyncPlan::default();

    for (index, step) in incoming.iter().enumerate() {
        match step.id {
            Some(id) => {
                if !live.contains(&id) {
                    return Err(AppError::list_field(
                        "steps",
                        index,
                        "id",
                        "invalid",
                        "A etapa informada não pertence a este workflow.",
                    ));
                }
                if !kept.insert(id) {
                    return Err(AppError::list_field(
                        "steps",
                        index,
                        "id",
                        "duplicate",
                        "A mesma etapa aparece mais de uma vez.",
                    ));
                }
                plan.updates.push((id, StepFields::try_from(step)?));
            }
            None => plan.creates.push(StepFields::try_from(step)?),
        }
    }

    plan.deletes = existing.iter().copied().filter(|id| !kept.contains(id)).collect();
    Ok(plan)
}

#[derive(Clone)]
pub struct WorkflowService {
    repo: WorkflowRepository,
}

impl WorkflowService {
    pub fn new(repo: WorkflowRepository) -> Self {
        Self { repo }
    }

    async fn require_live_workflow<'e, E>(&self, executor: E, id: Uuid) -> Result<Workflow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_workflow(executor, id, false)
            .await?
            .ok_or_else(|| AppError::not_found("Workflow", id))
    }

    // =========================================================================
    //  WORKFLOWS
    // =========================================================================

    pub async fn list_workflows<'e, E>(&self, executor: E) -> Result<Vec<WorkflowDetail>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let workflows = self.repo.list_workflows(&mut *conn).await?;
        let ids: Vec<Uuid> = workflows.iter().map(|w| w.id).collect();

        let mut steps_by_workflow: HashMap<Uuid, Vec<WorkflowStep>> = HashMap::new();
        for step in self.repo.list_steps_for_workflows(&mut *conn, &ids).await? {
            steps_by_workflow.entry(step.workflow_id).or_default().push(step);
        }

        Ok(workflows
            .into_iter()
            .map(|workflow| {
                let steps = steps_by_workflow.remove(&workflow.id).unwrap_or_default();
                WorkflowDetail { workflow, steps }
            })
            .collect())
    }

    pub async fn get_workflow<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<WorkflowDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let workflow = self
            .repo
            .find_workflow(&mut *conn, id, include_deleted)
            .await?
            .ok_or_else(|| AppError::not_found("Workflow", id))?;
        let steps = self.repo.list_steps(&mut *conn, id).await?;

        Ok(WorkflowDetail { workflow, steps })
    }

    /// Cria o workflow e as etapas na ordem recebida, numa transação.
    pub async fn create_workflow<'e, E>(
        &self,
        executor: E,
        payload: &WorkflowPayload,
    ) -> Result<WorkflowDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let created_on = required(payload.created_on, "createdOn")?;
        let stage_count = required(payload.stage_count, "stageCount")?;
        let steps = payload
            .steps
            .iter()
            .flatten()
            .map(StepFields::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = executor.begin().await?;

        let workflow = self
            .repo
            .create_workflow(
                &mut *tx,
                &payload.name,
                payload.description.as_deref(),
                &payload.created_by,
                created_on,
                payload.status,
                stage_count,
            )
            .await?;

        for fields in &steps {
            self.repo.create_step(&mut *tx, workflow.id, fields).await?;
        }

        let steps = self.repo.list_steps(&mut *tx, workflow.id).await?;
        tx.commit().await?;

        info!("Workflow '{}' criado com {} etapas", workflow.name, steps.len());
        Ok(WorkflowDetail { workflow, steps })
    }

    /// Substitui os campos do workflow e, se `steps` vier, reconcilia as etapas por id.
    pub async fn update_workflow<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &WorkflowPayload,
    ) -> Result<WorkflowDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let created_on = required(payload.created_on, "createdOn")?;
        let stage_count = required(payload.stage_count, "stageCount")?;

        let mut tx = executor.begin().await?;

        let workflow = self
            .repo
            .update_workflow(
                &mut *tx,
                id,
                &payload.name,
                payload.description.as_deref(),
                &payload.created_by,
                created_on,
                payload.status,
                stage_count,
            )
            .await?
            .ok_or_else(|| AppError::not_found("Workflow", id))?;

        if let Some(incoming) = &payload.steps {
            let existing: Vec<Uuid> = self
                .repo
                .list_steps(&mut *tx, id)
                .await?
                .into_iter()
                .map(|s| s.id)
                .collect();

            let plan = plan_step_sync(&existing, incoming)?;

            for (step_id, fields) in &plan.updates {
                self.repo
                    .update_step(&mut *tx, id, *step_id, fields)
                    .await?
                    .ok_or_else(|| AppError::not_found("Etapa", *step_id))?;
            }
            for fields in &plan.creates {
                self.repo.create_step(&mut *tx, id, fields).await?;
            }
            if !plan.deletes.is_empty() {
                self.repo.soft_delete_steps(&mut *tx, id, &plan.deletes).await?;
            }

            info!(
                "Workflow {} reconciliado: {} atualizadas, {} criadas, {} removidas",
                id,
                plan.updates.len(),
                plan.creates.len(),
                plan.deletes.len()
            );
        }

        let steps = self.repo.list_steps(&mut *tx, id).await?;
        tx.commit().await?;

        Ok(WorkflowDetail { workflow, steps })
    }

    pub async fn delete_workflow<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.soft_delete_workflow(executor, id).await? {
            return Err(AppError::not_found("Workflow", id));
        }
        Ok(())
    }

    // =========================================================================
    //  ETAPAS
    // =========================================================================

    pub async fn list_steps<'e, E>(&self, executor: E, workflow_id: Uuid) -> Result<Vec<WorkflowStep>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;
        self.repo.list_steps(&mut *conn, workflow_id).await
    }

    pub async fn get_step<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        step_id: Uuid,
        include_deleted: bool,
    ) -> Result<WorkflowStep, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        if !include_deleted {
            self.require_live_workflow(&mut *conn, workflow_id).await?;
        }
        self.repo
            .find_step(&mut *conn, workflow_id, step_id, include_deleted)
            .await?
            .ok_or_else(|| AppError::not_found("Etapa", step_id))
    }

    pub async fn create_step<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        payload: &StepPayload,
    ) -> Result<WorkflowStep, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let fields = StepFields::try_from(payload)?;
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;
        self.repo.create_step(&mut *conn, workflow_id, &fields).await
    }

    pub async fn update_step<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        step_id: Uuid,
        payload: &StepPayload,
    ) -> Result<WorkflowStep, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let fields = StepFields::try_from(payload)?;
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;
        self.repo
            .update_step(&mut *conn, workflow_id, step_id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found("Etapa", step_id))
    }

    pub async fn delete_step<'e, E>(&self, executor: E, workflow_id: Uuid, step_id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;
        if !self.repo.soft_delete_step(&mut *conn, workflow_id, step_id).await? {
            return Err(AppError::not_found("Etapa", step_id));
        }
        Ok(())
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
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;
        self.repo.list_assignments(&mut *conn, workflow_id).await
    }

    pub async fn get_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        assignment_id: Uuid,
        include_deleted: bool,
    ) -> Result<WorkflowAssignment, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        if !include_deleted {
            self.require_live_workflow(&mut *conn, workflow_id).await?;
        }
        self.repo
            .find_assignment(&mut *conn, workflow_id, assignment_id, include_deleted)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição", assignment_id))
    }

    pub async fn create_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        payload: &CreateAssignmentPayload,
    ) -> Result<WorkflowAssignment, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;

        let assignment = self
            .repo
            .create_assignment(
                &mut *conn,
                workflow_id,
                &payload.assigned_to,
                &payload.assigned_by,
                payload.assigned_at.unwrap_or_else(Utc::now),
                payload.due_date,
                payload.status.unwrap_or_default(),
                payload.notes.as_deref(),
            )
            .await?;

        info!("Workflow {} atribuído a '{}'", workflow_id, assignment.assigned_to);
        Ok(assignment)
    }

    pub async fn update_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        assignment_id: Uuid,
        payload: &UpdateAssignmentPayload,
    ) -> Result<WorkflowAssignment, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;
        self.repo
            .update_assignment(
                &mut *conn,
                workflow_id,
                assignment_id,
                payload.assigned_to.as_deref(),
                payload.assigned_by.as_deref(),
                payload.assigned_at,
                payload.due_date,
                payload.status,
                payload.notes.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição", assignment_id))
    }

    pub async fn delete_assignment<'e, E>(
        &self,
        executor: E,
        workflow_id: Uuid,
        assignment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.require_live_workflow(&mut *conn, workflow_id).await?;
        if !self.repo.soft_delete_assignment(&mut *conn, workflow_id, assignment_id).await? {
            return Err(AppError::not_found("Atribuição", assignment_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::flatten_validation_errors;

    fn step(id: Option<Uuid>, order: i32) -> StepPayload {
        StepPayload {
            id,
            name: format!("Etapa {order}"),
            step_order: Some(order),
            min_verifications: Some(1),
            verifier_role: "Gerente".into(),
            duration_days: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_listed_ids_creates_new_and_deletes_missing() {
        let (s1, s2, s3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let plan = plan_step_sync(&[s1, s2, s3], &[step(Some(s1), 1), step(None, 2)]).unwrap();

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].0, s1);
        assert_eq!(plan.creates.len(), 1);
        assert_eq!(plan.creates[0].step_order, 2);
        assert_eq!(plan.deletes, vec![s2, s3]);
    }

    #[test]
    fn empty_list_deletes_every_step() {
        let (s1, s2) = (Uuid::new_v4(), Uuid::new_v4());
        let plan = plan_step_sync(&[s1, s2], &[]).unwrap();
        assert!(plan.updates.is_empty() && plan.creates.is_empty());
        assert_eq!(plan.deletes, vec![s1, s2]);
    }

    #[test]
    fn foreign_step_id_is_rejected() {
        let s1 = Uuid::new_v4();
        let err = plan_step_sync(&[s1], &[step(Some(s1), 1), step(Some(Uuid::new_v4()), 2)]).unwrap_err();

        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        assert!(flatten_validation_errors(&errors).contains_key("steps[1].id"));
    }

    #[test]
    fn repeated_step_id_is_rejected() {
        let s1 = Uuid::new_v4();
        let err = plan_step_sync(&[s1], &[step(Some(s1), 1), step(Some(s1), 2)]).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn step_fields_copy_the_payload() {
        let fields = StepFields::try_from(&step(None, 4)).unwrap();
        assert_eq!(fields.step_order, 4);
        assert_eq!(fields.min_verifications, 1);
        assert_eq!(fields.verifier_role, "Gerente");
        assert_eq!(fields.duration_days, 3);
    }

    #[test]
    fn unvalidated_step_without_order_is_not_defaulted() {
        let payload = StepPayload { step_order: None, ..step(None, 1) };
        let err = StepFields::try_from(&payload).unwrap_err();

        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        assert!(errors.field_errors().contains_key("order"));

        let plan = plan_step_sync(&[], &[payload]);
        assert!(plan.is_err());
    }
}
