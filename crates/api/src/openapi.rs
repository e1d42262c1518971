// OpenAPI specification generation
//
// Used by the API server (for Swagger UI) and by the export-openapi binary
// (for static spec generation).

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use utoipa::OpenApi;
use waypoint_engine::{Action, State, TransitionRecord, WorkflowDefinition, WorkflowInstance};

/// OpenAPI documentation for the Waypoint API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::definitions::create_definition,
        api::definitions::list_definitions,
        api::definitions::get_definition,
        api::instances::start_instance,
        api::instances::list_instances,
        api::instances::get_instance,
        api::instances::list_available_actions,
        api::instances::execute_action,
    ),
    components(
        schemas(
            WorkflowDefinition, State, Action,
            WorkflowInstance, TransitionRecord,
            api::instances::StartInstanceRequest,
            api::instances::ExecuteActionRequest,
            ErrorResponse,
            ListResponse<WorkflowDefinition>,
            ListResponse<WorkflowInstance>,
            ListResponse<String>,
        )
    ),
    tags(
        (name = "workflow-definitions", description = "Workflow definition endpoints"),
        (name = "workflow-instances", description = "Workflow instance and action endpoints")
    ),
    info(
        title = "Waypoint API",
        version = "0.1.0",
        description = "API for defining workflow state machines and driving their instances",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> String {
        Self::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec")
    }
}
