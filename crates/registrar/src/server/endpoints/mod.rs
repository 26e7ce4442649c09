use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{error, warn};

use crate::db::{DbError, DbResult, RegistrarDb};
use crate::server::translate::{translate, Resource};
use crate::server::types::{ApiErrorType, ErrorKind};
use crate::types::AppState;

pub mod classrooms;
pub mod enrollments;
pub mod sections;
pub mod status;
pub mod students;
pub mod subjects;
pub mod teachers;

/// Runs a store call on the blocking pool. A failed call comes back as the
/// rendered error response.
async fn run_store<T, F>(
    s: &Arc<AppState>,
    resource: Resource,
    action: &'static str,
    f: F,
) -> Result<T, Response>
where
    F: FnOnce(&RegistrarDb) -> DbResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(s);
    match tokio::task::spawn_blocking(move || f(&state.db)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(store_error(resource, action, e)),
        Err(e) => {
            error!("Store task for {} did not finish: {}", action, e);
            Err(ApiErrorType::internal(format!("Failed to {action}")).into_response())
        }
    }
}

/// Logs a failed store call and renders the translated error.
fn store_error(resource: Resource, action: &str, err: DbError) -> Response {
    let api_err = translate(resource, action, &err);
    match api_err.kind {
        ErrorKind::Internal => error!("Failed to {}: {}", action, err),
        _ => warn!("Rejected {}: {}", action, err),
    }

    api_err.into_response()
}

/// Renders a validation failure.
fn rejected(action: &str, message: &'static str) -> Response {
    warn!("Rejected {}: {}", action, message);
    ApiErrorType::invalid_input(message).into_response()
}
