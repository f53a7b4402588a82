//! Webhook secret-token extractor and standalone verifier.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use habit_core::store::HabitStore;

use crate::{AppState, error::Error};

/// Header the chat platform echoes the configured webhook secret in.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Zero-size marker: present in the handler means the request was authenticated.
pub struct Authenticated;

/// Check the secret header against `expected`. With no secret configured
/// every request is accepted.
pub fn verify_secret(headers: &HeaderMap, expected: Option<&str>) -> Result<(), Error> {
  let Some(expected) = expected else {
    return Ok(());
  };

  let presented = headers
    .get(SECRET_HEADER)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  if presented != expected {
    return Err(Error::Unauthorized);
  }
  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: HabitStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_secret(&parts.headers, state.config.webhook_secret.as_deref()).inspect_err(|_| {
      tracing::warn!("rejected webhook request with missing or wrong secret token");
    })?;
    Ok(Authenticated)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers_with(secret: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(SECRET_HEADER, HeaderValue::from_str(secret).unwrap());
    headers
  }

  #[test]
  fn no_configured_secret_accepts_anything() {
    assert!(verify_secret(&HeaderMap::new(), None).is_ok());
    assert!(verify_secret(&headers_with("whatever"), None).is_ok());
  }

  #[test]
  fn matching_secret_is_accepted() {
    assert!(verify_secret(&headers_with("s3cret"), Some("s3cret")).is_ok());
  }

  #[test]
  fn wrong_or_missing_secret_is_rejected() {
    assert!(matches!(
      verify_secret(&headers_with("nope"), Some("s3cret")),
      Err(Error::Unauthorized)
    ));
    assert!(matches!(
      verify_secret(&HeaderMap::new(), Some("s3cret")),
      Err(Error::Unauthorized)
    ));
  }
}
