use std::ops::Deref;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::response::ErasedJson;
use garde::Validate;

use crate::data::ErrorDetail;

/// Runs garde validation on the wrapped extractor, answering `400` on failure.
pub struct Garde<T>(pub T);

impl<S, T> FromRequestParts<S> for Garde<T>
where
    T: FromRequestParts<S> + Deref,
    T::Target: Validate<Context = ()>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let inner = T::from_request_parts(parts, state).await.map_err(|e| e.into_response())?;

        if let Err(report) = inner.deref().validate() {
            tracing::debug!(%report, "rejected request parameters");
            return Err((
                StatusCode::BAD_REQUEST,
                ErasedJson::pretty(ErrorDetail::new(400, "Bad Request", report)),
            )
                .into_response());
        }

        Ok(Garde(inner))
    }
}
