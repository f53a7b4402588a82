//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  /// A button payload whose habit id could not be parsed.
  #[error("invalid payload: {0}")]
  InvalidPayload(String),

  /// Validation and not-found outcomes from the domain layer.
  #[error(transparent)]
  Core(#[from] habit_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::InvalidPayload(_) => StatusCode::BAD_REQUEST,
      Error::Core(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
