use lambda_http::{http::StatusCode, Body, Error, Request, RequestPayloadExt, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::error::TaskError;
use super::model::{CreateTaskPayload, TaskIdPayload};
use super::service;
use super::store::TaskStore;

/// HTTP Handler: GET /api/get_todos
pub async fn list_tasks_handler(store: &dyn TaskStore) -> Result<Response<Body>, Error> {
    match service::list_tasks(store).await {
        Ok(tasks) => json_response(serde_json::to_value(&tasks)?),
        Err(e) => {
            log_failure("list", &e);
            json_response(json!({ "error": e.to_string() }))
        }
    }
}

/// HTTP Handler: POST /api/add_todo
pub async fn create_task_handler(
    store: &dyn TaskStore,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let payload: CreateTaskPayload = read_payload(event);

    match service::create_task(store, payload).await {
        Ok(task) => {
            tracing::info!("Created todo {}", task.id);
            json_response(json!({ "success": true, "todo": task }))
        }
        Err(e) => failure_response("create", &e),
    }
}

/// HTTP Handler: POST /api/complete_todo
pub async fn toggle_task_handler(
    store: &dyn TaskStore,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let payload: TaskIdPayload = read_payload(event);

    let result = match service::parse_task_id(payload.id.as_ref()) {
        Ok(id) => service::toggle_task(store, id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => json_response(json!({ "success": true })),
        Err(e) => failure_response("toggle", &e),
    }
}

/// HTTP Handler: POST /api/delete_todo
pub async fn delete_task_handler(
    store: &dyn TaskStore,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let payload: TaskIdPayload = read_payload(event);

    let result = match service::parse_task_id(payload.id.as_ref()) {
        Ok(id) => service::delete_task(store, id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => json_response(json!({ "success": true })),
        Err(e) => failure_response("delete", &e),
    }
}

/// Decode a form-encoded or JSON body. Anything unreadable counts as an empty
/// submission so the required-field checks produce the error message.
fn read_payload<T: DeserializeOwned + Default>(event: &Request) -> T {
    match event.payload::<T>() {
        Ok(Some(payload)) => payload,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Unreadable request body: {}", e);
            T::default()
        }
    }
}

/// Domain failures still answer 200; the client only looks at `success`
fn failure_response(operation: &str, e: &TaskError) -> Result<Response<Body>, Error> {
    log_failure(operation, e);
    json_response(json!({ "success": false, "error": e.to_string() }))
}

fn log_failure(operation: &str, e: &TaskError) {
    match e {
        TaskError::Internal(msg) => tracing::error!("Failed to {} todo: {}", operation, msg),
        other => tracing::warn!("Rejected {} request: {}", operation, other),
    }
}

fn json_response(value: Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(value.to_string().into())
        .map_err(Box::new)?)
}
