use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::events::SessionView;
use crate::form::validation::FieldSnapshot;
use crate::form::{EventOutcome, FormEvent};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
    pub form: SessionView,
}

#[derive(Deserialize)]
pub struct AddSkillRequest {
    pub raw: String,
}

#[derive(Deserialize)]
pub struct CountRequest {
    #[serde(default)]
    pub message: String,
}

fn dispatch(state: &AppState, id: Uuid, event: FormEvent) -> Result<EventOutcome, AppError> {
    state.sessions.with_session(id, |session| session.dispatch(event))
}

/// POST /api/v1/forms
pub async fn handle_create(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), AppError> {
    let id = state.sessions.create()?;
    let form = state.sessions.with_session(id, |session| session.view())?;
    Ok((StatusCode::CREATED, Json(SessionCreated { id, form })))
}

/// GET /api/v1/forms/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.sessions.with_session(id, |session| session.view())?;
    Ok(Json(view))
}

/// DELETE /api/v1/forms/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/forms/:id/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddSkillRequest>,
) -> Result<Json<EventOutcome>, AppError> {
    let outcome = dispatch(&state, id, FormEvent::AddTag { raw: req.raw })?;
    Ok(Json(outcome))
}

/// DELETE /api/v1/forms/:id/skills/:index
/// Out-of-range indexes, negative ones included, remove nothing.
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, i64)>,
) -> Result<Json<EventOutcome>, AppError> {
    let outcome = dispatch(&state, id, FormEvent::RemoveTag { index })?;
    Ok(Json(outcome))
}

/// POST /api/v1/forms/:id/submit
/// Responds 422 with the same body shape when any field fails.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(snapshot): Json<FieldSnapshot>,
) -> Result<(StatusCode, Json<EventOutcome>), AppError> {
    let outcome = dispatch(&state, id, FormEvent::Submit(snapshot))?;
    Ok((outcome_status(&outcome), Json(outcome)))
}

/// POST /api/v1/forms/:id/events
/// Generic dispatch for any tagged `FormEvent`, e.g. `{"type":"add_tag","raw":"Rust"}`.
pub async fn handle_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<FormEvent>,
) -> Result<(StatusCode, Json<EventOutcome>), AppError> {
    let outcome = dispatch(&state, id, event)?;
    Ok((outcome_status(&outcome), Json(outcome)))
}

fn outcome_status(outcome: &EventOutcome) -> StatusCode {
    match outcome {
        EventOutcome::Submitted(report) if !report.result.valid => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    }
}

/// POST /api/v1/forms/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.sessions.with_session(id, |session| {
        session.dispatch(FormEvent::Reset);
        session.view()
    })?;
    Ok(Json(view))
}

/// POST /api/v1/forms/:id/theme
pub async fn handle_toggle_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventOutcome>, AppError> {
    let outcome = dispatch(&state, id, FormEvent::ToggleTheme)?;
    Ok(Json(outcome))
}

/// POST /api/v1/forms/:id/counter
pub async fn handle_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CountRequest>,
) -> Result<Json<EventOutcome>, AppError> {
    let outcome = dispatch(
        &state,
        id,
        FormEvent::CountChars {
            message: req.message,
        },
    )?;
    Ok(Json(outcome))
}

/// POST /api/v1/forms/:id/export
/// Returns the export document as a plain-text attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(snapshot): Json<FieldSnapshot>,
) -> Result<Response, AppError> {
    match dispatch(&state, id, FormEvent::Export(snapshot))? {
        EventOutcome::Exported { filename, body } => Ok((
            [
                (
                    header::CONTENT_TYPE,
                    "text/plain; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            body,
        )
            .into_response()),
        other => Err(AppError::Internal(anyhow!(
            "export produced unexpected outcome: {other:?}"
        ))),
    }
}
