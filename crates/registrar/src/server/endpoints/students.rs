use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::db::{CreateStudentRequest, ScheduleOrder};
use crate::pdf;
use crate::server::endpoints::{rejected, run_store};
use crate::server::translate::Resource;
use crate::server::types::ApiErrorType;
use crate::server::util::{attachment_filename, decode_body, parse_id};
use crate::types::AppState;

/// GET /api/students
pub async fn get_students(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/students");

    match run_store(&s, Resource::Student, "fetch students", |db| db.list_students()).await {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/students/:id
pub async fn get_student(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/students/{}", id);

    let id = match parse_id(&id, "student") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match run_store(&s, Resource::Student, "fetch student", move |db| db.get_student(id)).await {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(resp) => resp,
    }
}

/// POST /api/students
pub async fn post_student(State(s): State<Arc<AppState>>, body: Bytes) -> Response {
    info!("POST /api/students");

    let req: CreateStudentRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    if let Err(msg) = req.validate() {
        return rejected("create student", msg);
    }

    let result = run_store(&s, Resource::Student, "create student", move |db| {
        db.create_student(&req)
    })
    .await;

    match result {
        Ok(student) => {
            info!("Created student {} ({})", student.id, student.student_id);
            (StatusCode::CREATED, Json(student)).into_response()
        }
        Err(resp) => resp,
    }
}

/// GET /api/students/:id/schedule
///
/// Lists the student's sections by subject code, then section code. A
/// student without enrollments gets an empty list.
pub async fn get_schedule(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/students/{}/schedule", id);

    let id = match parse_id(&id, "student") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let result = run_store(&s, Resource::Schedule, "fetch schedule", move |db| {
        db.student_schedule(id, ScheduleOrder::Listing)
    })
    .await;

    match result {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/students/:id/schedule/pdf
///
/// Renders the student's schedule as a downloadable PDF.
pub async fn get_schedule_pdf(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/students/{}/schedule/pdf", id);

    let id = match parse_id(&id, "student") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let student = run_store(&s, Resource::Student, "fetch student info", move |db| {
        db.get_student(id)
    })
    .await;

    let student = match student {
        Ok(student) => student,
        Err(resp) => return resp,
    };

    let items = run_store(&s, Resource::Schedule, "fetch schedule", move |db| {
        db.student_schedule(id, ScheduleOrder::Export)
    })
    .await;

    let items = match items {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    let filename = attachment_filename(&student.first_name, &student.last_name);
    let disposition = match HeaderValue::from_str(&format!("attachment; filename={filename}")) {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to build PDF disposition for student {}: {}", id, e);
            return ApiErrorType::internal("Failed to generate PDF").into_response();
        }
    };

    let document = pdf::render_schedule(&student, &items);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response()
}

/// DELETE /api/students/:id/sections/:section_id
pub async fn delete_section(
    Path((student_id, section_id)): Path<(String, String)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("DELETE /api/students/{}/sections/{}", student_id, section_id);

    let student_id = match parse_id(&student_id, "student") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let section_id = match parse_id(&section_id, "section") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let result = run_store(&s, Resource::Enrollment, "drop section", move |db| {
        db.drop_enrollment(student_id, section_id)
    })
    .await;

    match result {
        Ok(()) => {
            info!("Student {} dropped section {}", student_id, section_id);
            (
                StatusCode::OK,
                Json(json!({ "message": "Section dropped successfully" })),
            )
                .into_response()
        }
        Err(resp) => resp,
    }
}
