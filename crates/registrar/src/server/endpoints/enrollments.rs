use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::EnrollmentRequest;
use crate::server::endpoints::{rejected, run_store};
use crate::server::translate::Resource;
use crate::server::util::decode_body;
use crate::types::AppState;

/// POST /api/enrollments
///
/// Capacity and schedule conflicts are enforced by the store and come back
/// as 409.
pub async fn post_enrollment(State(s): State<Arc<AppState>>, body: Bytes) -> Response {
    info!("POST /api/enrollments");

    let req: EnrollmentRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    if let Err(msg) = req.validate() {
        return rejected("enroll student", msg);
    }

    match run_store(&s, Resource::Enrollment, "enroll student", move |db| db.enroll(&req)).await {
        Ok(enrollment) => {
            info!(
                "Enrolled student {} in section {}",
                enrollment.student_id, enrollment.section_id
            );
            (StatusCode::CREATED, Json(enrollment)).into_response()
        }
        Err(resp) => resp,
    }
}
