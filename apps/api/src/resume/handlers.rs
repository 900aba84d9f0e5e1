use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeSummary};
use crate::render::{pdf_filename, render_resume};
use crate::resume::form::{FormAction, ResumeForm};
use crate::resume::normalize::normalize_for_edit;
use crate::resume::preview::{project, ResumePreview};
use crate::resume::validation::validate_required;
use crate::session::Session;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeSummary>,
}

/// A stored record together with its display projection.
#[derive(Serialize)]
pub struct ResumeViewResponse {
    pub record: ResumeRecord,
    pub preview: ResumePreview,
}

/// Editor state: the padded record plus the flags the editor UI needs.
#[derive(Serialize)]
pub struct FormStateResponse {
    pub record: ResumeRecord,
    pub has_data: bool,
    pub is_dirty: bool,
    pub preview: ResumePreview,
}

impl From<&ResumeForm> for FormStateResponse {
    fn from(form: &ResumeForm) -> Self {
        Self {
            record: form.record().clone(),
            has_data: form.has_data(),
            is_dirty: form.is_dirty(),
            preview: project(form.record()),
        }
    }
}

/// Body of preview and update requests. `record` replaces the stored record
/// as the starting point; `actions` are then applied in order.
#[derive(Debug, Default, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub actions: Vec<FormAction>,
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = state.store.fetch_list(&session).await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ResumeViewResponse>), AppError> {
    let mut record = ResumeForm::load(normalize_for_edit(&body)).snapshot();
    record.id = None;
    record.document_id = None;
    validate_required(&record)?;

    let created = state.store.create(&session, &record).await?;
    info!("Created resume {:?}", created.document_id);
    Ok((StatusCode::CREATED, Json(view(created))))
}

/// GET /api/v1/resumes/new
pub async fn handle_new() -> Json<FormStateResponse> {
    Json(FormStateResponse::from(&ResumeForm::new()))
}

/// GET /api/v1/resumes/:document_id
pub async fn handle_get(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<String>,
) -> Result<Json<ResumeViewResponse>, AppError> {
    let record = state.store.fetch_one(&session, &document_id).await?;
    Ok(Json(view(record)))
}

/// GET /api/v1/resumes/:document_id/edit
pub async fn handle_edit(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<String>,
) -> Result<Json<FormStateResponse>, AppError> {
    let record = state.store.fetch_one(&session, &document_id).await?;
    Ok(Json(FormStateResponse::from(&ResumeForm::load(record))))
}

/// POST /api/v1/resumes/:document_id/preview
/// Applies the edits without persisting anything.
pub async fn handle_preview(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<String>,
    Json(req): Json<EditRequest>,
) -> Result<Json<FormStateResponse>, AppError> {
    let form = edited_form(&state, &session, &document_id, req).await?;
    Ok(Json(FormStateResponse::from(&form)))
}

/// PUT /api/v1/resumes/:document_id
pub async fn handle_update(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<String>,
    Json(req): Json<EditRequest>,
) -> Result<Json<ResumeViewResponse>, AppError> {
    let form = edited_form(&state, &session, &document_id, req).await?;
    let record = form.snapshot();
    validate_required(&record)?;

    let updated = state.store.update(&session, &document_id, &record).await?;
    info!("Updated resume {document_id}");
    Ok(Json(view(updated)))
}

/// DELETE /api/v1/resumes/:document_id
pub async fn handle_delete(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.remove(&session, &document_id).await?;
    info!("Deleted resume {document_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/:document_id/pdf
pub async fn handle_pdf(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<String>,
) -> Result<Response, AppError> {
    let record = state.store.fetch_one(&session, &document_id).await?;
    let tex = render_resume(&project(&record));
    let pdf = state.pdf.compile(&tex).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        pdf_filename(&record.full_name)
    );
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

/// GET /api/v1/resumes/:document_id/tex
pub async fn handle_tex(
    State(state): State<AppState>,
    session: Session,
    Path(document_id): Path<String>,
) -> Result<Response, AppError> {
    let record = state.store.fetch_one(&session, &document_id).await?;
    let tex = render_resume(&project(&record));
    Ok(([(CONTENT_TYPE, "text/x-tex; charset=utf-8")], tex).into_response())
}

fn view(record: ResumeRecord) -> ResumeViewResponse {
    ResumeViewResponse {
        preview: project(&record),
        record,
    }
}

/// Loads the starting record (submitted or stored) into a form and applies
/// the requested actions.
async fn edited_form(
    state: &AppState,
    session: &Session,
    document_id: &str,
    req: EditRequest,
) -> Result<ResumeForm, AppError> {
    let mut record = match &req.record {
        Some(submitted) => normalize_for_edit(submitted),
        None => state.store.fetch_one(session, document_id).await?,
    };
    record.document_id = Some(document_id.to_string());

    let mut form = ResumeForm::load(record);
    let total = req.actions.len();
    let applied = form.apply_all(req.actions);
    if applied < total {
        info!("Ignored {} of {total} form actions on {document_id}", total - applied);
    }
    Ok(form)
}
