pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::form::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form sessions
        .route("/api/v1/forms", post(handlers::handle_create))
        .route(
            "/api/v1/forms/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        // Skill tags
        .route("/api/v1/forms/:id/skills", post(handlers::handle_add_skill))
        .route(
            "/api/v1/forms/:id/skills/:index",
            delete(handlers::handle_remove_skill),
        )
        // Form actions
        .route("/api/v1/forms/:id/submit", post(handlers::handle_submit))
        .route("/api/v1/forms/:id/reset", post(handlers::handle_reset))
        .route("/api/v1/forms/:id/theme", post(handlers::handle_toggle_theme))
        .route("/api/v1/forms/:id/counter", post(handlers::handle_count))
        .route("/api/v1/forms/:id/export", post(handlers::handle_export))
        .route("/api/v1/forms/:id/events", post(handlers::handle_event))
        .with_state(state)
}
