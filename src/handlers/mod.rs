use axum::{
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

pub mod openapi;
pub mod swagger;

#[inline]
fn into_response(content_type: impl AsRef<str>, body: impl IntoResponse) -> Response {
    ([(CONTENT_TYPE, content_type.as_ref())], body).into_response()
}
