//! Habits and the validated title type used to create them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, user::UserId};

/// Minimum number of characters a title must have after trimming.
pub const MIN_TITLE_CHARS: usize = 2;

/// Internal surrogate key for a habit row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct HabitId(pub i64);

impl fmt::Display for HabitId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

// ─── Title ───────────────────────────────────────────────────────────────────

/// A trimmed habit title of at least [`MIN_TITLE_CHARS`] characters.
///
/// Only obtainable through [`HabitTitle::parse`], so a store never sees an
/// invalid title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HabitTitle(String);

impl HabitTitle {
  pub fn parse(raw: &str) -> Result<Self> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < MIN_TITLE_CHARS {
      return Err(Error::TitleTooShort { len, min: MIN_TITLE_CHARS });
    }
    Ok(Self(trimmed.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for HabitTitle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A full habit row. Deleting a habit only clears `is_active`; the row and
/// its completion logs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
  pub habit_id:   HabitId,
  pub user_id:    UserId,
  pub title:      String,
  pub is_active:  bool,
  pub created_at: DateTime<Utc>,
}

/// The projection returned by active-habit listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSummary {
  pub habit_id: HabitId,
  pub title:    String,
}
