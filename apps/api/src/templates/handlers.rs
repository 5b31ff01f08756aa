use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::template::{TemplateDefinition, TemplateSummary};
use crate::render::handlers::{preview_document, PreviewResponse};
use crate::templates::registry::CategoryCount;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// The caller's session id from the `x-session-id` header.
pub fn session_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("Missing '{SESSION_HEADER}' header")))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// GET /api/v1/templates[?category=]
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Json<Vec<TemplateSummary>> {
    let summaries = match params.category.as_deref() {
        Some(category) => state
            .registry
            .list_by_category(category)
            .into_iter()
            .map(TemplateDefinition::summary)
            .collect(),
        None => state
            .registry
            .list_all()
            .iter()
            .map(TemplateDefinition::summary)
            .collect(),
    };
    Json(summaries)
}

/// GET /api/v1/templates/categories
pub async fn handle_list_categories(State(state): State<AppState>) -> Json<Vec<CategoryCount>> {
    Json(state.registry.categories())
}

#[derive(Deserialize)]
pub struct TemplateQuery {
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub css: bool,
}

#[derive(Serialize)]
pub struct TemplateDetailResponse {
    pub template: TemplateDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewResponse>,
}

/// GET /api/v1/templates/:id[?preview=true&css=true]
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<TemplateQuery>,
) -> Result<Json<TemplateDetailResponse>, AppError> {
    let template = state.registry.get_by_id(&id)?;
    let css = if params.css {
        Some(state.registry.generate_css(&id)?)
    } else {
        None
    };
    let preview = if params.preview {
        Some(preview_document(&state.registry, template, None)?)
    } else {
        None
    };
    Ok(Json(TemplateDetailResponse {
        template: template.clone(),
        css,
        preview,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub success: bool,
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateSummary>,
}

/// POST /api/v1/templates/:id
/// Makes `id` the session's template in use. Unknown ids leave the selection untouched.
pub async fn handle_select_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SelectionResponse>, AppError> {
    let session = session_id(&headers)?;
    let mut selection = state.selections.load(&session).await?;

    if !state.registry.select(&mut selection, &id) {
        return Err(AppError::NotFound(format!("Template '{id}' not found")));
    }
    state.selections.save(&session, &selection).await?;
    info!("Session {session} selected template '{id}'");

    let template = state.registry.get_by_id(&id)?.summary();
    Ok(Json(SelectionResponse {
        success: true,
        template_id: Some(id),
        template: Some(template),
    }))
}

/// GET /api/v1/templates/selected
pub async fn handle_get_selected(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SelectionResponse>, AppError> {
    let session = session_id(&headers)?;
    let selection = state.selections.load(&session).await?;

    // A stored id can outlive its template when the catalogue changes between deploys.
    let template = selection
        .current()
        .and_then(|id| state.registry.get_by_id(id).ok())
        .map(TemplateDefinition::summary);

    Ok(Json(SelectionResponse {
        success: template.is_some(),
        template_id: template.as_ref().map(|t| t.id.clone()),
        template,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_requires_non_blank_header() {
        let mut headers = HeaderMap::new();
        assert!(matches!(session_id(&headers), Err(AppError::Validation(_))));

        headers.insert(SESSION_HEADER, HeaderValue::from_static("  "));
        assert!(session_id(&headers).is_err());

        headers.insert(SESSION_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(session_id(&headers).unwrap(), "abc-123");
    }
}
