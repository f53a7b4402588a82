//! User — the internal identity a chat account resolves to.
//!
//! Users are created on first contact and never deleted. The external id is
//! immutable; the display name is overwritten on every interaction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Internal surrogate key for a user row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Identifier assigned by the chat platform (e.g. a Telegram user id).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ExternalId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:      UserId,
  pub external_id:  ExternalId,
  /// Latest handle seen for this account; `None` if the platform sent none.
  pub display_name: Option<String>,
  pub created_at:   DateTime<Utc>,
}
