use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::layout::{pagination_report, PaginationReport};
use crate::models::document::DocumentModel;
use crate::models::template::{TemplateDefinition, TemplateKind};
use crate::render::render;
use crate::sample::{sample_cover_letter, sample_cv};
use crate::state::AppState;
use crate::templates::registry::TemplateRegistry;
use crate::validation::{validate, ValidationError};

/// Rendered output plus the advisory signals shown next to it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub html: String,
    pub css: String,
    pub validation_errors: Vec<ValidationError>,
    pub is_valid: bool,
    pub pagination: PaginationReport,
}

/// Renders, validates and estimates `document` (or the built-in sample for
/// the template's kind when `None`).
pub fn preview_document(
    registry: &TemplateRegistry,
    template: &TemplateDefinition,
    document: Option<&DocumentModel>,
) -> Result<PreviewResponse, AppError> {
    let sample;
    let document = match document {
        Some(doc) => doc,
        None => {
            debug!("No document supplied; previewing '{}' with sample data", template.id);
            sample = match template.kind {
                TemplateKind::Cv => sample_cv(),
                TemplateKind::CoverLetter => sample_cover_letter(),
            };
            &sample
        }
    };

    let output = render(registry, document, template)?;
    let validation_errors = validate(document, template);
    Ok(PreviewResponse {
        html: output.html,
        css: output.css,
        is_valid: validation_errors.is_empty(),
        validation_errors,
        pagination: pagination_report(document),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub template_id: String,
    pub data: Option<DocumentModel>,
}

/// POST /api/v1/templates/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let template = state.registry.get_by_id(&req.template_id)?;
    let response = preview_document(&state.registry, template, req.data.as_ref())?;
    Ok(Json(response))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub template_id: String,
    pub document: DocumentModel,
}

/// POST /api/v1/documents/render
pub async fn handle_render_document(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let template = state.registry.get_by_id(&req.template_id)?;
    let response = preview_document(&state.registry, template, Some(&req.document))?;
    debug!(
        "Rendered document {} with '{}': {} page(s), {} warning(s)",
        req.document.id,
        template.id,
        response.pagination.pages,
        response.validation_errors.len()
    );
    Ok(Json(response))
}
