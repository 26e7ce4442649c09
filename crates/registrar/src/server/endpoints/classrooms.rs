use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::CreateClassroomRequest;
use crate::server::endpoints::{rejected, run_store};
use crate::server::translate::Resource;
use crate::server::util::{decode_body, parse_id};
use crate::types::AppState;

/// GET /api/classrooms
pub async fn get_classrooms(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/classrooms");

    match run_store(&s, Resource::Classroom, "fetch classrooms", |db| db.list_classrooms()).await {
        Ok(classrooms) => (StatusCode::OK, Json(classrooms)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/classrooms/:id
pub async fn get_classroom(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/classrooms/{}", id);

    let id = match parse_id(&id, "classroom") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let result = run_store(&s, Resource::Classroom, "fetch classroom", move |db| {
        db.get_classroom(id)
    })
    .await;

    match result {
        Ok(classroom) => (StatusCode::OK, Json(classroom)).into_response(),
        Err(resp) => resp,
    }
}

/// POST /api/classrooms
pub async fn post_classroom(State(s): State<Arc<AppState>>, body: Bytes) -> Response {
    info!("POST /api/classrooms");

    let req: CreateClassroomRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    if let Err(msg) = req.validate() {
        return rejected("create classroom", msg);
    }

    let result = run_store(&s, Resource::Classroom, "create classroom", move |db| {
        db.create_classroom(&req)
    })
    .await;

    match result {
        Ok(classroom) => (StatusCode::CREATED, Json(classroom)).into_response(),
        Err(resp) => resp,
    }
}
