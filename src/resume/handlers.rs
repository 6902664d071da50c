use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{info, instrument};

use crate::{
    errors::ResumeError,
    resume::{
        dto::{MessageResponse, PhotoUpload, SkillRequest, SkillsResponse, TemplateRequest},
        model::{CertificationEntry, EducationEntry, ExperienceEntry, ResumeRecord},
        preview::PreviewDocument,
        repo::ResumeStore,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/resume", get(get_resume))
        .route("/resume/preview", get(get_preview))
        .route("/resume/export", get(export_resume))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/resume", put(put_resume))
        .route("/resume", delete(clear_resume))
        .route("/resume/skills", post(add_skill))
        .route("/resume/skills/:skill", delete(remove_skill))
        .route("/resume/experience", post(add_experience))
        .route("/resume/experience/:index", delete(remove_experience))
        .route("/resume/education", post(add_education))
        .route("/resume/education/:index", delete(remove_education))
        .route("/resume/certifications", post(add_certification))
        .route("/resume/certifications/:index", delete(remove_certification))
        .route("/resume/template", put(set_template))
        .route("/resume/photo", post(upload_photo))
        .route("/resume/photo", delete(remove_photo))
        .route("/resume/import", post(import_resume))
}

#[instrument(skip(state))]
pub async fn get_resume(State(state): State<AppState>) -> Json<ResumeRecord> {
    Json(ResumeStore::new(state.store.clone()).load().await)
}

/// Replaces the record wholesale (the form's "every edit mutates in place"
/// surface: the client sends the whole record after a field edit).
#[instrument(skip(state, payload))]
pub async fn put_resume(
    State(state): State<AppState>,
    Json(payload): Json<ResumeRecord>,
) -> Json<ResumeRecord> {
    ResumeStore::new(state.store.clone()).save(&payload).await;
    state.preview.mark_dirty();
    Json(payload)
}

#[instrument(skip(state))]
pub async fn clear_resume(State(state): State<AppState>) -> Json<ResumeRecord> {
    let record = ResumeRecord::default();
    ResumeStore::new(state.store.clone()).save(&record).await;
    state.preview.mark_dirty();
    Json(record)
}

#[instrument(skip(state, payload))]
pub async fn add_skill(
    State(state): State<AppState>,
    Json(payload): Json<SkillRequest>,
) -> Result<Json<SkillsResponse>, ResumeError> {
    if payload.skill.trim().is_empty() {
        return Err(ResumeError::Validation("Skill must not be empty".into()));
    }
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    // Duplicates are a no-op; the response carries the (unchanged) list.
    if record.add_skill(&payload.skill) {
        resumes.save(&record).await;
        state.preview.mark_dirty();
    }
    Ok(Json(SkillsResponse {
        skills: record.skills,
    }))
}

#[instrument(skip(state))]
pub async fn remove_skill(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> Json<SkillsResponse> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    if record.remove_skill(&skill) {
        resumes.save(&record).await;
        state.preview.mark_dirty();
    }
    Json(SkillsResponse {
        skills: record.skills,
    })
}

#[instrument(skip(state, payload))]
pub async fn add_experience(
    State(state): State<AppState>,
    Json(payload): Json<ExperienceEntry>,
) -> Json<ResumeRecord> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    record.add_experience(payload);
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Json(record)
}

#[instrument(skip(state))]
pub async fn remove_experience(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<ResumeRecord>, ResumeError> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    if !record.remove_experience(index) {
        return Err(ResumeError::EntryNotFound);
    }
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Ok(Json(record))
}

#[instrument(skip(state, payload))]
pub async fn add_education(
    State(state): State<AppState>,
    Json(payload): Json<EducationEntry>,
) -> Json<ResumeRecord> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    record.add_education(payload);
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Json(record)
}

#[instrument(skip(state))]
pub async fn remove_education(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<ResumeRecord>, ResumeError> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    if !record.remove_education(index) {
        return Err(ResumeError::EntryNotFound);
    }
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Ok(Json(record))
}

#[instrument(skip(state, payload))]
pub async fn add_certification(
    State(state): State<AppState>,
    Json(payload): Json<CertificationEntry>,
) -> Json<ResumeRecord> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    record.add_certification(payload);
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Json(record)
}

#[instrument(skip(state))]
pub async fn remove_certification(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<ResumeRecord>, ResumeError> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    if !record.remove_certification(index) {
        return Err(ResumeError::EntryNotFound);
    }
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Ok(Json(record))
}

#[instrument(skip(state, payload))]
pub async fn set_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplateRequest>,
) -> Json<ResumeRecord> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    record.set_template(payload.template);
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Json(record)
}

#[instrument(skip(state, payload))]
pub async fn upload_photo(
    State(state): State<AppState>,
    Json(payload): Json<PhotoUpload>,
) -> Result<Json<MessageResponse>, ResumeError> {
    let bytes = BASE64
        .decode(payload.photo_b64.as_bytes())
        .map_err(|_| ResumeError::Validation("Invalid base64 photo data".into()))?;

    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    record.attach_photo(&bytes, &payload.content_type);
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Ok(Json(MessageResponse {
        message: "Photo attached".into(),
    }))
}

#[instrument(skip(state))]
pub async fn remove_photo(State(state): State<AppState>) -> Json<MessageResponse> {
    let resumes = ResumeStore::new(state.store.clone());
    let mut record = resumes.load().await;
    record.clear_photo();
    resumes.save(&record).await;
    state.preview.mark_dirty();
    Json(MessageResponse {
        message: "Photo removed".into(),
    })
}

/// The debounced live preview. May lag a just-submitted edit by the quiet
/// period; `GET /export/document` always renders fresh.
#[instrument(skip(state))]
pub async fn get_preview(State(state): State<AppState>) -> Json<PreviewDocument> {
    Json(state.preview.current().await)
}

/// Replaces the record wholesale from a user-supplied JSON document. Partial
/// documents are fine (missing fields default); malformed ones are rejected
/// with no partial apply.
#[instrument(skip(state, body))]
pub async fn import_resume(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ResumeRecord>, ResumeError> {
    let record: ResumeRecord =
        serde_json::from_str(&body).map_err(|e| ResumeError::ImportFormat(e.to_string()))?;

    ResumeStore::new(state.store.clone()).save(&record).await;
    state.preview.mark_dirty();
    info!("resume record imported");
    Ok(Json(record))
}

/// The serialized record as a downloadable JSON document.
#[instrument(skip(state))]
pub async fn export_resume(State(state): State<AppState>) -> Result<impl IntoResponse, ResumeError> {
    let record = ResumeStore::new(state.store.clone()).load().await;
    let body = serde_json::to_string_pretty(&record)
        .map_err(|e| ResumeError::Internal(e.into()))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume.json\"",
            ),
        ],
        body,
    ))
}
