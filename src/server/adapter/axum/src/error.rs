/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use universal_server::{PageResponse, SsrError};

/// A render that never started, e.g. a request reaching the pipeline
/// without a nonce or locale. Answered with the plain-text error page
/// the pipeline uses for its own failures.
pub(crate) struct AxumError(pub SsrError);

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    tracing::error!(code = self.0.code(), error = %self.0, "request rejected before rendering");
    let page = PageResponse::error(&self.0);
    let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = page.body.unwrap_or_default();
    (status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
  }
}

impl From<SsrError> for AxumError {
  fn from(err: SsrError) -> Self {
    Self(err)
  }
}
