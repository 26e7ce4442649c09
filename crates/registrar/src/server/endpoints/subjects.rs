use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::CreateSubjectRequest;
use crate::server::endpoints::{rejected, run_store};
use crate::server::translate::Resource;
use crate::server::util::{decode_body, parse_id};
use crate::types::AppState;

/// GET /api/subjects
///
/// Subjects are listed by code.
pub async fn get_subjects(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/subjects");

    match run_store(&s, Resource::Subject, "fetch subjects", |db| db.list_subjects()).await {
        Ok(subjects) => (StatusCode::OK, Json(subjects)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/subjects/:id
pub async fn get_subject(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/subjects/{}", id);

    let id = match parse_id(&id, "subject") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match run_store(&s, Resource::Subject, "fetch subject", move |db| db.get_subject(id)).await {
        Ok(subject) => (StatusCode::OK, Json(subject)).into_response(),
        Err(resp) => resp,
    }
}

/// POST /api/subjects
///
/// `description` may be omitted and is stored as an empty string.
pub async fn post_subject(State(s): State<Arc<AppState>>, body: Bytes) -> Response {
    info!("POST /api/subjects");

    let req: CreateSubjectRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    if let Err(msg) = req.validate() {
        return rejected("create subject", msg);
    }

    let result = run_store(&s, Resource::Subject, "create subject", move |db| {
        db.create_subject(&req)
    })
    .await;

    match result {
        Ok(subject) => (StatusCode::CREATED, Json(subject)).into_response(),
        Err(resp) => resp,
    }
}
