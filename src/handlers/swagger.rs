use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::{AppState, swagger_ui::render_page};

pub async fn swagger_ui(State(state): State<Arc<AppState>>) -> Html<String> {
    let versions = state.versions.versions();
    tracing::debug!(versions = versions.len(), "rendering swagger ui");
    Html(render_page(&state.page, &versions))
}
