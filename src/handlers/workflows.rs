// src/handlers/workflows.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::JsonBody},
    config::AppState,
    models::{
        workflow::{
            CreateAssignmentPayload, StepPayload, UpdateAssignmentPayload, WorkflowAssignment,
            WorkflowDetail, WorkflowPayload, WorkflowStep,
        },
        DataResponse, IncludeDeletedQuery,
    },
};

// =============================================================================
//  WORKFLOWS
// =============================================================================

// GET /api/v1/workflows
#[utoipa::path(
    get,
    path = "/api/v1/workflows",
    tag = "Workflows",
    responses(
        (status = 200, description = "Workflows ativos com suas etapas", body = Vec<WorkflowDetail>)
    )
)]
pub async fn list_workflows(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let workflows = app_state.workflow_service.list_workflows(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(workflows))))
}

// POST /api/v1/workflows
#[utoipa::path(
    post,
    path = "/api/v1/workflows",
    tag = "Workflows",
    request_body = WorkflowPayload,
    responses(
        (status = 201, description = "Workflow criado com as etapas", body = WorkflowDetail),
        (status = 422, description = "Campos ou etapas inválidos")
    )
)]
pub async fn create_workflow(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<WorkflowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let workflow = app_state
        .workflow_service
        .create_workflow(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(workflow))))
}

// GET /api/v1/workflows/{id}
#[utoipa::path(
    get,
    path = "/api/v1/workflows/{id}",
    tag = "Workflows",
    params(
        ("id" = Uuid, Path, description = "ID do workflow"),
        IncludeDeletedQuery
    ),
    responses(
        (status = 200, description = "Workflow com etapas", body = WorkflowDetail),
        (status = 404, description = "Workflow não encontrado")
    )
)]
pub async fn get_workflow(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<IncludeDeletedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let workflow = app_state
        .workflow_service
        .get_workflow(&app_state.db_pool, id, query.include_deleted)
        .await?;
    Ok((StatusCode::OK, Json(DataResponse::new(workflow))))
}

// PUT /api/v1/workflows/{id}
#[utoipa::path(
    put,
    path = "/api/v1/workflows/{id}",
    tag = "Workflows",
    request_body = WorkflowPayload,
    params(("id" = Uuid, Path, description = "ID do workflow")),
    responses(
        (status = 200, description = "Workflow atualizado; etapas reconciliadas por id", body = WorkflowDetail),
        (status = 404, description = "Workflow não encontrado"),
        (status = 422, description = "Campos inválidos ou etapa de outro workflow")
    )
)]
pub async fn update_workflow(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<WorkflowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let workflow = app_state
        .workflow_service
        .update_workflow(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(DataResponse::new(workflow))))
}

// DELETE /api/v1/workflows/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/workflows/{id}",
    tag = "Workflows",
    params(("id" = Uuid, Path, description = "ID do workflow")),
    responses(
        (status = 204, description = "Workflow removido (soft delete)"),
        (status = 404, description = "Workflow não encontrado")
    )
)]
pub async fn delete_workflow(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.workflow_service.delete_workflow(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ETAPAS
// =============================================================================

// GET /api/v1/workflows/{workflow_id}/steps
#[utoipa::path(
    get,
    path = "/api/v1/workflows/{workflow_id}/steps",
    tag = "Workflows",
    params(("workflow_id" = Uuid, Path, description = "ID do workflow")),
    responses(
        (status = 200, description = "Etapas ordenadas por 'order'", body = Vec<WorkflowStep>),
        (status = 404, description = "Workflow não encontrado")
    )
)]
pub async fn list_steps(
    State(app_state): State<AppState>,
    Path(workflow_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let steps = app_state
        .workflow_service
        .list_steps(&app_state.db_pool, workflow_id)
        .await?;
    Ok((StatusCode::OK, Json(DataResponse::new(steps))))
}

// POST /api/v1/workflows/{workflow_id}/steps
#[utoipa::path(
    post,
    path = "/api/v1/workflows/{workflow_id}/steps",
    tag = "Workflows",
    request_body = StepPayload,
    params(("workflow_id" = Uuid, Path, description = "ID do workflow")),
    responses(
        (status = 201, description = "Etapa criada", body = WorkflowStep),
        (status = 404, description = "Workflow não encontrado")
    )
)]
pub async fn create_step(
    State(app_state): State<AppState>,
    Path(workflow_id): Path<Uuid>,
    JsonBody(payload): JsonBody<StepPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let step = app_state
        .workflow_service
        .create_step(&app_state.db_pool, workflow_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(step))))
}

// GET /api/v1/workflows/{workflow_id}/steps/{step_id}
#[utoipa::path(
    get,
    path = "/api/v1/workflows/{workflow_id}/steps/{step_id}",
    tag = "Workflows",
    params(
        ("workflow_id" = Uuid, Path, description = "ID do workflow"),
        ("step_id" = Uuid, Path, description = "ID da etapa"),
        IncludeDeletedQuery
    ),
    responses(
        (status = 200, description = "Etapa", body = WorkflowStep),
        (status = 404, description = "Etapa não encontrada")
    )
)]
pub async fn get_step(
    State(app_state): State<AppState>,
    Path((workflow_id, step_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<IncludeDeletedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let step = app_state
        .workflow_service
        .get_step(&app_state.db_pool, workflow_id, step_id, query.include_deleted)
        .await?;
    Ok((StatusCode::OK, Json(DataResponse::new(step))))
}

// PUT /api/v1/workflows/{workflow_id}/steps/{step_id}
#[utoipa::path(
    put,
    path = "/api/v1/workflows/{workflow_id}/steps/{step_id}",
    tag = "Workflows",
    request_body = StepPayload,
    params(
        ("workflow_id" = Uuid, Path, description = "ID do workflow"),
        ("step_id" = Uuid, Path, description = "ID da etapa")
    ),
    responses(
        (status = 200, description = "Etapa atualizada", body = WorkflowStep),
        (status = 404, description = "Etapa não encontrada")
    )
)]
pub async fn update_step(
    State(app_state): State<AppState>,
    Path((workflow_id, step_id)): Path<(Uuid, Uuid)>,
    JsonBody(payload): JsonBody<StepPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let step = app_state
        .workflow_service
        .update_step(&app_state.db_pool, workflow_id, step_id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(DataResponse::new(step))))
}

// DELETE /api/v1/workflows/{workflow_id}/steps/{step_id}
#[utoipa::path(
    delete,
    path = "/api/v1/workflows/{workflow_id}/steps/{step_id}",
    tag = "Workflows",
    params(
        ("workflow_id" = Uuid, Path, description = "ID do workflow"),
        ("step_id" = Uuid, Path, description = "ID da etapa")
    ),
    responses(
        (status = 204, description = "Etapa removida (soft delete)"),
        (status = 404, description = "Etapa não encontrada")
    )
)]
pub async fn delete_step(
    State(app_state): State<AppState>,
    Path((workflow_id, step_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .workflow_service
        .delete_step(&app_state.db_pool, workflow_id, step_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ATRIBUIÇÕES
// =============================================================================

// GET /api/v1/workflows/{workflow_id}/assignments
#[utoipa::path(
    get,
    path = "/api/v1/workflows/{workflow_id}/assignments",
    tag = "Workflows",
    params(("workflow_id" = Uuid, Path, description = "ID do workflow")),
    responses(
        (status = 200, description = "Atribuições do workflow", body = Vec<WorkflowAssignment>),
        (status = 404, description = "Workflow não encontrado")
    )
)]
pub async fn list_assignments(
    State(app_state): State<AppState>,
    Path(workflow_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let assignments = app_state
        .workflow_service
        .list_assignments(&app_state.db_pool, workflow_id)
        .await?;
    Ok((StatusCode::OK, Json(DataResponse::new(assignments))))
}

// POST /api/v1/workflows/{workflow_id}/assignments
#[utoipa::path(
    post,
    path = "/api/v1/workflows/{workflow_id}/assignments",
    tag = "Workflows",
    request_body = CreateAssignmentPayload,
    params(("workflow_id" = Uuid, Path, description = "ID do workflow")),
    responses(
        (status = 201, description = "Atribuição criada", body = WorkflowAssignment),
        (status = 404, description = "Workflow não encontrado")
    )
)]
pub async fn create_assignment(
    State(app_state): State<AppState>,
    Path(workflow_id): Path<Uuid>,
    JsonBody(payload): JsonBody<CreateAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let assignment = app_state
        .workflow_service
        .create_assignment(&app_state.db_pool, workflow_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(assignment))))
}

// GET /api/v1/workflows/{workflow_id}/assignments/{assignment_id}
#[utoipa::path(
    get,
    path = "/api/v1/workflows/{workflow_id}/assignments/{assignment_id}",
    tag = "Workflows",
    params(
        ("workflow_id" = Uuid, Path, description = "ID do workflow"),
        ("assignment_id" = Uuid, Path, description = "ID da atribuição"),
        IncludeDeletedQuery
    ),
    responses(
        (status = 200, description = "Atribuição", body = WorkflowAssignment),
        (status = 404, description = "Atribuição não encontrada")
    )
)]
pub async fn get_assignment(
    State(app_state): State<AppState>,
    Path((workflow_id, assignment_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<IncludeDeletedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = app_state
        .workflow_service
        .get_assignment(&app_state.db_pool, workflow_id, assignment_id, query.include_deleted)
        .await?;
    Ok((StatusCode::OK, Json(DataResponse::new(assignment))))
}

// PUT /api/v1/workflows/{workflow_id}/assignments/{assignment_id}
#[utoipa::path(
    put,
    path = "/api/v1/workflows/{workflow_id}/assignments/{assignment_id}",
    tag = "Workflows",
    request_body = UpdateAssignmentPayload,
    params(
        ("workflow_id" = Uuid, Path, description = "ID do workflow"),
        ("assignment_id" = Uuid, Path, description = "ID da atribuição")
    ),
    responses(
        (status = 200, description = "Atribuição atualizada", body = WorkflowAssignment),
        (status = 404, description = "Atribuição não encontrada")
    )
)]
pub async fn update_assignment(
    State(app_state): State<AppState>,
    Path((workflow_id, assignment_id)): Path<(Uuid, Uuid)>,
    JsonBody(payload): JsonBody<UpdateAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let assignment = app_state
        .workflow_service
        .update_assignment(&app_state.db_pool, workflow_id, assignment_id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(DataResponse::new(assignment))))
}

// DELETE /api/v1/workflows/{workflow_id}/assignments/{assignment_id}
#[utoipa::path(
    delete,
    path = "/api/v1/workflows/{workflow_id}/assignments/{assignment_id}",
    tag = "Workflows",
    params(
        ("workflow_id" = Uuid, Path, description = "ID do workflow"),
        ("assignment_id" = Uuid, Path, description = "ID da atribuição")
    ),
    responses(
        (status = 204, description = "Atribuição removida (soft delete)"),
        (status = 404, description = "Atribuição não encontrada")
    )
)]
pub async fn delete_assignment(
    State(app_state): State<AppState>,
    Path((workflow_id, assignment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .workflow_service
        .delete_assignment(&app_state.db_pool, workflow_id, assignment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
