use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::RenderError;
use crate::templates::registry::TemplateError;
use crate::templates::selection::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Render error: {0}")]
    Render(RenderError),

    #[error("Selection store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(_) => AppError::NotFound(err.to_string()),
            TemplateError::Cyclic { .. } | TemplateError::Duplicate(_) => {
                AppError::UnprocessableEntity(err.to_string())
            }
            TemplateError::Catalogue(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Template(inner) => inner.into(),
            other => AppError::Render(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Render(e) => {
                match e {
                    RenderError::Markup { section, source } => {
                        tracing::error!("Render error in section '{section}': {source}");
                    }
                    other => tracing::error!("Render error: {other}"),
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The document could not be rendered".to_string(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Selection store error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "Template selection is temporarily unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_errors_map_to_statuses() {
        let not_found: AppError = TemplateError::NotFound("nope".into()).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let cyclic: AppError = TemplateError::Cyclic {
            chain: vec!["a".into(), "b".into(), "a".into()],
        }
        .into();
        assert_eq!(cyclic.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_render_error_unwraps_template_cause() {
        let err: AppError = RenderError::Template(TemplateError::NotFound("x".into())).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let markup: AppError = RenderError::Markup {
            section: "experience".into(),
            source: std::fmt::Error,
        }
        .into();
        assert_eq!(markup.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_is_service_unavailable() {
        let err: AppError = StoreError::Poisoned.into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
