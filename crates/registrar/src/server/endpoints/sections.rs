use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::CreateSectionRequest;
use crate::server::endpoints::{rejected, run_store};
use crate::server::translate::Resource;
use crate::server::util::{decode_body, parse_id};
use crate::types::AppState;

/// GET /api/sections
pub async fn get_sections(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/sections");

    match run_store(&s, Resource::Section, "fetch sections", |db| db.list_sections()).await {
        Ok(sections) => (StatusCode::OK, Json(sections)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/sections/:id
pub async fn get_section(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/sections/{}", id);

    let id = match parse_id(&id, "section") {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match run_store(&s, Resource::Section, "fetch section", move |db| db.get_section(id)).await {
        Ok(section) => (StatusCode::OK, Json(section)).into_response(),
        Err(resp) => resp,
    }
}

/// POST /api/sections
///
/// The section row and its days are written in one transaction. The
/// response echoes the days in the order they were requested.
pub async fn post_section(State(s): State<Arc<AppState>>, body: Bytes) -> Response {
    info!("POST /api/sections");

    let req: CreateSectionRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    let slot = match req.validate() {
        Ok(slot) => slot,
        Err(msg) => return rejected("create section", msg),
    };

    let result = run_store(&s, Resource::Section, "create section", move |db| {
        db.create_section(&req, &slot)
    })
    .await;

    match result {
        Ok(section) => {
            info!(
                "Created section {} ({}) meeting {} day(s)",
                section.id,
                section.section_code,
                section.days.len()
            );
            (StatusCode::CREATED, Json(section)).into_response()
        }
        Err(resp) => resp,
    }
}
