pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers as render_handlers;
use crate::state::AppState;
use crate::templates::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template catalogue
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        .route(
            "/api/v1/templates/categories",
            get(handlers::handle_list_categories),
        )
        .route(
            "/api/v1/templates/selected",
            get(handlers::handle_get_selected),
        )
        .route(
            "/api/v1/templates/preview",
            post(render_handlers::handle_preview),
        )
        .route(
            "/api/v1/templates/:id",
            get(handlers::handle_get_template).post(handlers::handle_select_template),
        )
        // Live preview for the editor
        .route(
            "/api/v1/documents/render",
            post(render_handlers::handle_render_document),
        )
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
