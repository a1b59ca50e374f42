use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

use crate::errors::{AppError, LayoutError};
use crate::export::filename::export_filename;
use crate::export::pdf::{DocumentInfo, PdfWriter};
use crate::layout::{compose_document, Page};
use crate::models::resume::ResumeDocument;

pub const EXPORT_ID_HEADER: &str = "x-export-id";

#[derive(Serialize)]
pub struct LayoutResponse {
    pub export_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub page_count: usize,
    pub pages: Vec<Page>,
}

/// POST /api/v1/layout
/// Returns the positioned pages as JSON, for previews and debugging.
pub async fn handle_layout(
    payload: Result<Json<ResumeDocument>, JsonRejection>,
) -> Result<Json<LayoutResponse>, AppError> {
    let document = read_document(payload)?;
    let export_id = Uuid::new_v4();

    async move {
        let pages = run_blocking(move || compose_document(&document)).await?;
        info!(pages = pages.len(), "Layout served");
        Ok::<_, AppError>(Json(LayoutResponse {
            export_id,
            generated_at: Utc::now(),
            page_count: pages.len(),
            pages,
        }))
    }
    .instrument(info_span!("layout", %export_id))
    .await
}

/// POST /api/v1/export
/// Lays out the résumé and returns it as a PDF download.
pub async fn handle_export(
    payload: Result<Json<ResumeDocument>, JsonRejection>,
) -> Result<Response, AppError> {
    let document = read_document(payload)?;
    let export_id = Uuid::new_v4();
    let filename = export_filename(document.personal_info.full_name.as_deref(), Utc::now());

    async move {
        let (page_count, bytes) = run_blocking(move || {
            let pages = compose_document(&document)?;
            let info = DocumentInfo {
                title: document.personal_info.full_name.clone(),
                author: document.personal_info.full_name.clone(),
            };
            Ok((pages.len(), PdfWriter::new().write(&pages, &info)))
        })
        .await?;

        info!(pages = page_count, bytes = bytes.len(), %filename, "Export served");

        let headers = [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (
                header::HeaderName::from_static(EXPORT_ID_HEADER),
                export_id.to_string(),
            ),
        ];
        Ok::<_, AppError>((headers, bytes).into_response())
    }
    .instrument(info_span!("export", %export_id))
    .await
}

fn read_document(
    payload: Result<Json<ResumeDocument>, JsonRejection>,
) -> Result<ResumeDocument, AppError> {
    payload
        .map(|Json(document)| document)
        .map_err(|rejection| match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
            _ => AppError::Validation(rejection.body_text()),
        })
}

/// Runs the synchronous layout core off the async executor, inside the caller's span.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, LayoutError> + Send + 'static,
    T: Send + 'static,
{
    let span = Span::current();
    let result = tokio::task::spawn_blocking(move || span.in_scope(work))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))?;
    Ok(result?)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
