//! Error types for `habit-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::habit::HabitId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// A habit title had fewer than [`crate::habit::MIN_TITLE_CHARS`]
  /// characters after trimming.
  #[error("habit title is too short ({len} chars, need at least {min})")]
  TitleTooShort { len: usize, min: usize },

  /// The habit is missing, inactive, or owned by someone else.
  #[error("habit not found: {0}")]
  HabitNotFound(HabitId),

  /// The week around this date runs past the representable calendar.
  #[error("no complete week contains {0}")]
  DateOutOfRange(NaiveDate),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
