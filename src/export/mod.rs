mod document;

use axum::{extract::State, response::Html, routing::get, Router};
use tracing::instrument;

use crate::resume::{preview, repo::ResumeStore};
use crate::state::AppState;

pub use document::printable_document;

pub fn router() -> Router<AppState> {
    Router::new().route("/export/document", get(export_document))
}

/// Snapshot of the current record rendered into a standalone printable page.
/// Always renders fresh rather than reading the debounced preview cache.
#[instrument(skip(state))]
pub async fn export_document(State(state): State<AppState>) -> Html<String> {
    let record = ResumeStore::new(state.store.clone()).load().await;
    let doc = preview::render(&record);
    Html(printable_document(&doc))
}
