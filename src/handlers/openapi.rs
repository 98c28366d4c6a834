use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::response::ErasedJson;
use garde::Validate;
use mime::APPLICATION_JSON;
use serde::Deserialize;

use super::into_response;
use crate::{AppState, data::ErrorDetail, documents::DEFAULT_VERSION, valid::Garde};

#[derive(Debug, Deserialize, Validate)]
pub struct DocumentQuery {
    #[garde(length(min = 1))]
    v: Option<String>,
}

pub async fn openapi_document(
    State(state): State<Arc<AppState>>,
    Garde(Query(query)): Garde<Query<DocumentQuery>>,
) -> Response {
    let version = query.v.as_deref().unwrap_or(DEFAULT_VERSION);

    match state.documents.get(version) {
        Some(document) => into_response(APPLICATION_JSON, document.to_string()),
        None => (
            StatusCode::NOT_FOUND,
            ErasedJson::pretty(ErrorDetail::new(
                404,
                "Not Found",
                format!("unknown openapi version: {version}"),
            )),
        )
            .into_response(),
    }
}
