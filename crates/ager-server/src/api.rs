//! REST handlers for the task queue.

use std::sync::Arc;

use ager_core::domain::{ErrorKind, Task};
use ager_core::AgerError;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::state::AppState;

// ── Errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub path: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("Too many task submissions from this address, try again later")]
    RateLimited,

    #[error(transparent)]
    Queue(#[from] AgerError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Queue(err) => match err.kind() {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else if let ApiError::Queue(err) = &self {
            warn!(error = %err, "request rejected");
        }

        let errors = match &self {
            ApiError::Validation(errors) => Some(errors.as_slice()),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            errors,
        };
        (status, Json(body)).into_response()
    }
}

// ── Validation ──────────────────────────────────────────────────

/// Validated `POST /api/tasks` body.
#[derive(Debug, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub priority: u32,
}

/// Check `{name, priority}`: the name is trimmed and must not end up empty,
/// the priority must be a non-negative integer. Every failing field is
/// reported.
pub fn validate_new_task(body: &Value) -> Result<NewTask, ApiError> {
    let mut errors = Vec::new();

    let name = match body.get("name") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        Some(Value::String(_)) => {
            errors.push(FieldError {
                path: "name",
                message: "Task name is required.".into(),
            });
            None
        }
        _ => {
            errors.push(FieldError {
                path: "name",
                message: "Task name must be a string.".into(),
            });
            None
        }
    };

    let priority = match body.get("priority") {
        Some(Value::Number(n)) => {
            if let Some(p) = n.as_u64() {
                match u32::try_from(p) {
                    Ok(p) => Some(p),
                    Err(_) => {
                        errors.push(FieldError {
                            path: "priority",
                            message: format!("Priority must be at most {}.", u32::MAX),
                        });
                        None
                    }
                }
            } else if n.as_i64().is_some() {
                errors.push(FieldError {
                    path: "priority",
                    message: "Priority must be zero or a positive number.".into(),
                });
                None
            } else {
                errors.push(FieldError {
                    path: "priority",
                    message: "Priority must be an integer.".into(),
                });
                None
            }
        }
        _ => {
            errors.push(FieldError {
                path: "priority",
                message: "Priority must be a number.".into(),
            });
            None
        }
    };

    match (name, priority) {
        (Some(name), Some(priority)) if errors.is_empty() => Ok(NewTask { name, priority }),
        _ => Err(ApiError::Validation(errors)),
    }
}

// ── Handlers ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.queue.list_pending().await)
}

pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let NewTask { name, priority } = validate_new_task(&body)?;
    let task = state.queue.submit(name, priority).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_completed(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.queue.list_completed().await)
}

pub async fn clear_completed(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.queue.clear_completed().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_task(State(state): State<Arc<AppState>>) -> Json<Option<Task>> {
    Json(state.queue.current().await)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_and_trims() {
        let task = validate_new_task(&json!({"name": "  render  ", "priority": 0})).unwrap();
        assert_eq!(
            task,
            NewTask {
                name: "render".into(),
                priority: 0
            }
        );
    }

    #[rstest]
    #[case(json!({"name": "   ", "priority": 1}), vec!["name"])]
    #[case(json!({"priority": 1}), vec!["name"])]
    #[case(json!({"name": "a", "priority": -1}), vec!["priority"])]
    #[case(json!({"name": "a", "priority": 1.5}), vec!["priority"])]
    #[case(json!({"name": "a", "priority": "3"}), vec!["priority"])]
    #[case(json!({"name": "", "priority": null}), vec!["name", "priority"])]
    #[case(json!({"name": "a", "priority": 5_000_000_000u64}), vec!["priority"])]
    fn rejects_bad_fields(#[case] body: Value, #[case] paths: Vec<&str>) {
        let Err(ApiError::Validation(errors)) = validate_new_task(&body) else {
            panic!("expected validation error for {body}");
        };
        let got: Vec<&str> = errors.iter().map(|e| e.path).collect();
        assert_eq!(got, paths);
    }

    #[test]
    fn queue_errors_map_to_status() {
        let invalid = ApiError::from(AgerError::invalid_input("bad")).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let internal =
            ApiError::from(AgerError::InternalInconsistency("dup".into())).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            ApiError::RateLimited.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
