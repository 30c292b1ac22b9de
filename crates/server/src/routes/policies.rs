use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use common::types::MessageBody;
use models::policy::Policy;

use crate::{errors::JsonApiError, state::ServerState};

/// Response of `DELETE /api/policies`.
#[derive(Debug, Serialize)]
pub struct DeleteAllBody {
    pub message: String,
    pub deleted: u64,
}

/// Unwrap the JSON body, turning malformed input into a 400 with the usual error shape.
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| JsonApiError::bad_request(rejection.body_text()))
}

#[utoipa::path(
    post, path = "/api/policies", tag = "policies",
    request_body = crate::openapi::PolicyDoc,
    responses(
        (status = 201, description = "Policy added", body = crate::openapi::MessageDoc),
        (status = 400, description = "Duplicate application number or invalid body", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageBody>), JsonApiError> {
    let body = json_body(payload)?;
    let created = state
        .policies
        .create(body)
        .await
        .map_err(|e| JsonApiError::from_service("create_policy", "Failed to add policy", e))?;
    info!(application_number = %created.application_number, "created policy");
    Ok((StatusCode::CREATED, Json(MessageBody::new("Policy added!"))))
}

#[utoipa::path(
    get, path = "/api/policies", tag = "policies",
    responses(
        (status = 200, description = "Every stored policy", body = [crate::openapi::PolicyDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Policy>>, JsonApiError> {
    let list = state
        .policies
        .list()
        .await
        .map_err(|e| JsonApiError::from_service("list_policies", "Failed to fetch policies", e))?;
    info!(count = list.len(), "list policies");
    Ok(Json(list))
}

#[utoipa::path(
    put, path = "/api/policies/{applicationNumber}", tag = "policies",
    params(("applicationNumber" = String, Path, description = "Application number of the policy")),
    request_body = crate::openapi::PolicyDoc,
    responses(
        (status = 200, description = "Policy updated", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Policy not found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(application_number): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageBody>, JsonApiError> {
    let body = json_body(payload)?;
    state
        .policies
        .update(&application_number, body)
        .await
        .map_err(|e| JsonApiError::from_service("update_policy", "Failed to update policy", e))?;
    Ok(Json(MessageBody::new("Policy updated!")))
}

#[utoipa::path(
    delete, path = "/api/policies/{applicationNumber}", tag = "policies",
    params(("applicationNumber" = String, Path, description = "Application number of the policy")),
    responses(
        (status = 200, description = "Policy deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Policy not found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(application_number): Path<String>,
) -> Result<Json<MessageBody>, JsonApiError> {
    state
        .policies
        .delete(&application_number)
        .await
        .map_err(|e| JsonApiError::from_service("delete_policy", "Failed to delete policy", e))?;
    Ok(Json(MessageBody::new("Policy deleted")))
}

#[utoipa::path(
    delete, path = "/api/policies", tag = "policies",
    responses(
        (status = 200, description = "All policies deleted"),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_all(State(state): State<ServerState>) -> Result<Json<DeleteAllBody>, JsonApiError> {
    let deleted = state
        .policies
        .delete_all()
        .await
        .map_err(|e| JsonApiError::from_service("delete_all_policies", "Failed to delete policies", e))?;
    Ok(Json(DeleteAllBody { message: "All policies deleted".into(), deleted }))
}
