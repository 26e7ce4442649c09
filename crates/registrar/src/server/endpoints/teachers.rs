use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::CreateTeacherRequest;
use crate::server::endpoints::{rejected, run_store};
use crate::server::translate::Resource;
use crate::server::util::{decode_body, parse_id};
use crate::types::AppState;

/// GET /api/teachers
pub async fn get_teachers(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/teachers");

    match run_store(&s, Resource::Teacher, "fetch teachers", |db| db.list_teachers()).await {
        Ok(teachers) => (StatusCode::OK, Json(teachers)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/teachers/:id
pub async fn get_teacher(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/teachers/{}", id);

    let id = match parse_id(&id, "teacher") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match run_store(&s, Resource::Teacher, "fetch teacher", move |db| db.get_teacher(id)).await {
        Ok(teacher) => (StatusCode::OK, Json(teacher)).into_response(),
        Err(resp) => resp,
    }
}

/// POST /api/teachers
pub async fn post_teacher(State(s): State<Arc<AppState>>, body: Bytes) -> Response {
    info!("POST /api/teachers");

    let req: CreateTeacherRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    if let Err(msg) = req.validate() {
        return rejected("create teacher", msg);
    }

    let result = run_store(&s, Resource::Teacher, "create teacher", move |db| {
        db.create_teacher(&req)
    })
    .await;

    match result {
        Ok(teacher) => (StatusCode::CREATED, Json(teacher)).into_response(),
        Err(resp) => resp,
    }
}
