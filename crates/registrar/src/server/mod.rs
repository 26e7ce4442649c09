use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{middleware as mw, Router};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;

use crate::config::{READ_TIMEOUT, WRITE_TIMEOUT};
use crate::server::endpoints::{
    classrooms, enrollments, sections, status, students, subjects, teachers,
};
use crate::server::middleware::cors;
use crate::types::AppState;

mod endpoints;
mod middleware;
mod translate;
mod types;
mod util;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let student_router = Router::new()
        .route(
            "/students",
            get(students::get_students).post(students::post_student),
        )
        .route("/students/:id", get(students::get_student))
        .route("/students/:id/schedule", get(students::get_schedule))
        .route("/students/:id/schedule/pdf", get(students::get_schedule_pdf))
        .route(
            "/students/:id/sections/:section_id",
            delete(students::delete_section),
        );

    let catalog_router = Router::new()
        .route(
            "/teachers",
            get(teachers::get_teachers).post(teachers::post_teacher),
        )
        .route("/teachers/:id", get(teachers::get_teacher))
        .route(
            "/subjects",
            get(subjects::get_subjects).post(subjects::post_subject),
        )
        .route("/subjects/:id", get(subjects::get_subject))
        .route(
            "/classrooms",
            get(classrooms::get_classrooms).post(classrooms::post_classroom),
        )
        .route("/classrooms/:id", get(classrooms::get_classroom))
        .route(
            "/sections",
            get(sections::get_sections).post(sections::post_section),
        )
        .route("/sections/:id", get(sections::get_section))
        .route("/enrollments", post(enrollments::post_enrollment));

    let api_router = Router::new().merge(student_router).merge(catalog_router);

    Router::new()
        .route("/health", get(status::get_health))
        .nest("/api", api_router)
        .with_state(app_state)
        .layer(TimeoutLayer::new(WRITE_TIMEOUT))
        .layer(RequestBodyTimeoutLayer::new(READ_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        // Outermost, so preflight requests never reach the router.
        .layer(mw::from_fn(cors::apply_cors))
}
