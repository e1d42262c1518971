// Workflow definition HTTP routes
// Decision: Definitions are write-once; there is no update or delete route

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use waypoint_engine::{DefinitionStore, WorkflowDefinition};

use super::{ApiError, AppState, ErrorResponse, ListResponse};

/// Submit a new workflow definition
#[utoipa::path(
    post,
    path = "/v1/workflow-definitions",
    request_body = WorkflowDefinition,
    responses(
        (status = 201, description = "Definition stored", body = WorkflowDefinition),
        (status = 400, description = "Definition failed validation", body = ErrorResponse),
        (status = 409, description = "Definition id already exists", body = ErrorResponse)
    ),
    tag = "workflow-definitions"
)]
pub async fn create_definition(
    State(state): State<AppState>,
    Json(definition): Json<WorkflowDefinition>,
) -> Result<Response, ApiError> {
    let stored = state
        .engine
        .definitions()
        .submit_definition(definition)
        .await?;

    let location = state.location(&format!(
        "/v1/workflow-definitions/{}",
        urlencoding::encode(&stored.id)
    ));
    Ok(created(&location, stored.as_ref().clone()))
}

/// List all stored workflow definitions
#[utoipa::path(
    get,
    path = "/v1/workflow-definitions",
    responses(
        (status = 200, description = "Definitions ordered by id", body = ListResponse<WorkflowDefinition>)
    ),
    tag = "workflow-definitions"
)]
pub async fn list_definitions(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<WorkflowDefinition>>, ApiError> {
    let definitions = state.engine.definitions().list_definitions().await?;
    Ok(Json(ListResponse::new(
        definitions.iter().map(|d| d.as_ref().clone()).collect(),
    )))
}

/// Get a workflow definition by id
#[utoipa::path(
    get,
    path = "/v1/workflow-definitions/{id}",
    params(
        ("id" = String, Path, description = "Definition ID")
    ),
    responses(
        (status = 200, description = "Definition found", body = WorkflowDefinition),
        (status = 404, description = "Definition not found", body = ErrorResponse)
    ),
    tag = "workflow-definitions"
)]
pub async fn get_definition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDefinition>, ApiError> {
    let definition = state.engine.definitions().get_definition(&id).await?;
    Ok(Json(definition.as_ref().clone()))
}

/// 201 response with a Location header when the location is a valid header value
pub(crate) fn created<T: serde::Serialize>(location: &str, body: T) -> Response {
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/workflow-definitions",
            post(create_definition).get(list_definitions),
        )
        .route("/v1/workflow-definitions/:id", get(get_definition))
        .with_state(state)
}
