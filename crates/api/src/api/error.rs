// Engine error → HTTP response mapping
// Decision: Guard failures are 422 (request understood, but not applicable to
// the instance's current state); malformed definitions are 400

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use waypoint_engine::{EngineError, StoreError};

use super::common::ErrorResponse;

/// Error returned from API handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>, code: &str) -> Self {
        Self {
            status,
            body: ErrorResponse::new(message, code),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match &e {
            StoreError::DuplicateDefinitionId(_) => StatusCode::CONFLICT,
            StoreError::InvalidDefinition(_) => StatusCode::BAD_REQUEST,
            StoreError::DefinitionNotFound(_) => StatusCode::NOT_FOUND,
        };
        Self::new(status, e.to_string(), e.code())
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match &e {
            EngineError::Store(store) => return store.clone().into(),
            EngineError::DefinitionNotFound(_) | EngineError::InstanceNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            EngineError::NoValidInitialState(_) => StatusCode::UNPROCESSABLE_ENTITY,
            e if e.is_guard_failure() => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Workflow engine error: {}", e);
            return Self::new(status, "Internal server error", e.code());
        }
        Self::new(status, e.to_string(), e.code())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
