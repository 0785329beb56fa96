//! Axum route handlers for the Session API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::plan::{Plan, PLANS};
use crate::models::resume::ResumeField;
use crate::session::flow::{export_document, purchase_plan, submit_for_optimization};
use crate::session::SessionView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateDraftRequest {
    /// Keyed by field, so each field appears at most once and the result does
    /// not depend on application order. Unknown field names are rejected at
    /// parse time.
    pub fields: BTreeMap<ResumeField, String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: &'static [Plan],
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub exported: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/plans
pub async fn handle_list_plans() -> Json<PlansResponse> {
    Json(PlansResponse { plans: PLANS })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let handle = state.sessions.create().await;
    let view = handle.lock().await.snapshot();
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let view = handle.lock().await.snapshot();
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/sessions/:id/draft
///
/// Replaces the named fields and leaves the rest untouched. Input view only.
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<UpdateDraftRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    session.set_fields(request.fields)?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/optimize
///
/// Sends the draft to the text generator. Responds once the call resolves:
/// with the preview on success, or an error after returning to input. The
/// transition completes even if the client goes away first.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let view = submit_for_optimization(handle, state.llm.clone()).await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/revise
pub async fn handle_revise(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    session.revise()?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/plan
pub async fn handle_select_plan(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SelectPlanRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let view = purchase_plan(&handle, &request.plan_id, state.payments.as_ref()).await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    export_document(&handle, state.exporter.clone()).await?;
    Ok(Json(ExportResponse { exported: true }))
}

/// GET /api/v1/sessions/:id/document
///
/// The printable page itself; opening it in a browser raises the print dialog.
pub async fn handle_document(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let page = handle.lock().await.printable_document()?;
    Ok(Html(page))
}
