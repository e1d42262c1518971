// Workflow instance HTTP routes
// Decision: Actions are executed by POSTing to the instance's actions collection

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use waypoint_engine::WorkflowInstance;

use super::definitions::created;
use super::{ApiError, AppState, ErrorResponse, ListResponse};

/// Request to start a new workflow instance
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartInstanceRequest {
    /// Id of a stored workflow definition.
    #[schema(example = "order-fulfilment")]
    pub definition_id: String,
}

/// Request to execute an action against an instance
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExecuteActionRequest {
    /// Id of an action declared by the instance's definition.
    #[schema(example = "ship")]
    pub action_id: String,
}

/// Query parameters for instance listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListInstancesQuery {
    /// Only return instances of this definition
    pub definition_id: Option<String>,
}

/// Start a new workflow instance
#[utoipa::path(
    post,
    path = "/v1/workflow-instances",
    request_body = StartInstanceRequest,
    responses(
        (status = 201, description = "Instance started in the initial state", body = WorkflowInstance),
        (status = 404, description = "Definition not found", body = ErrorResponse),
        (status = 422, description = "Definition has no enabled initial state", body = ErrorResponse)
    ),
    tag = "workflow-instances"
)]
pub async fn start_instance(
    State(state): State<AppState>,
    Json(req): Json<StartInstanceRequest>,
) -> Result<Response, ApiError> {
    let instance = state.engine.start_instance(&req.definition_id).await?;
    let location = state.location(&format!("/v1/workflow-instances/{}", instance.id));
    Ok(created(&location, instance))
}

/// List workflow instances
#[utoipa::path(
    get,
    path = "/v1/workflow-instances",
    params(ListInstancesQuery),
    responses(
        (status = 200, description = "Instances ordered by id", body = ListResponse<WorkflowInstance>)
    ),
    tag = "workflow-instances"
)]
pub async fn list_instances(
    State(state): State<AppState>,
    Query(query): Query<ListInstancesQuery>,
) -> Json<ListResponse<WorkflowInstance>> {
    let instances = state
        .engine
        .list_instances(query.definition_id.as_deref())
        .await;
    Json(ListResponse::new(instances))
}

/// Get a workflow instance by id
#[utoipa::path(
    get,
    path = "/v1/workflow-instances/{id}",
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    responses(
        (status = 200, description = "Instance found", body = WorkflowInstance),
        (status = 404, description = "Instance not found", body = ErrorResponse)
    ),
    tag = "workflow-instances"
)]
pub async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    let instance = state.engine.get_instance(id).await?;
    Ok(Json(instance))
}

/// List the actions that can currently be executed on an instance
#[utoipa::path(
    get,
    path = "/v1/workflow-instances/{id}/actions",
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    responses(
        (status = 200, description = "Ids of executable actions", body = ListResponse<String>),
        (status = 404, description = "Instance not found", body = ErrorResponse)
    ),
    tag = "workflow-instances"
)]
pub async fn list_available_actions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListResponse<String>>, ApiError> {
    let actions = state.engine.available_actions(id).await?;
    Ok(Json(ListResponse::new(actions)))
}

/// Execute an action against an instance
#[utoipa::path(
    post,
    path = "/v1/workflow-instances/{id}/actions",
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    request_body = ExecuteActionRequest,
    responses(
        (status = 200, description = "Transition applied", body = WorkflowInstance),
        (status = 404, description = "Instance not found", body = ErrorResponse),
        (status = 422, description = "Action rejected in the current state", body = ErrorResponse)
    ),
    tag = "workflow-instances"
)]
pub async fn execute_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ExecuteActionRequest>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    let instance = state.engine.execute_action(id, &req.action_id).await?;
    Ok(Json(instance))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/workflow-instances",
            post(start_instance).get(list_instances),
        )
        .route("/v1/workflow-instances/:id", get(get_instance))
        .route(
            "/v1/workflow-instances/:id/actions",
            get(list_available_actions).post(execute_action),
        )
        .with_state(state)
}
