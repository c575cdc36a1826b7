use axum::{extract::State, response::Html, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod render;
pub mod summary;

pub use render::render_dashboard;
pub use summary::{build_summary, write_outputs, Summary};

/// Everything the dashboard server hands out. Built once after the weekly
/// run; nothing is refreshed while serving.
#[derive(Clone)]
pub struct AppState {
    pub html: String,
    pub summary: Summary,
    pub notes: Vec<String>,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/rankings", get(rankings_handler))
        .route("/api/notes", get(notes_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.html.clone())
}

/// GET /api/rankings
async fn rankings_handler(State(state): State<Arc<AppState>>) -> Json<Summary> {
    Json(state.summary.clone())
}

/// GET /api/notes
async fn notes_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.notes.clone())
}
