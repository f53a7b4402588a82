//! Completion logs: toggle outcomes and the (habit, date) status map.
//!
//! A log row's presence means the habit was done that day. Un-marking deletes
//! the row, so "absent" and "not done" are the same state.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::HabitId;

/// Result of flipping the done state of one (habit, date) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
  /// The pair was undone and is now done.
  Marked,
  /// The pair was done and is now undone.
  Removed,
  /// The habit is missing, inactive, or belongs to another user.
  NotFound,
}

/// Done-state per (habit, date), holding only pairs that have a log row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap(HashMap<(HabitId, NaiveDate), bool>);

impl StatusMap {
  pub fn new() -> Self { Self::default() }

  /// The stored value, or `None` when no log row exists for the pair.
  pub fn get(&self, habit_id: HabitId, date: NaiveDate) -> Option<bool> {
    self.0.get(&(habit_id, date)).copied()
  }

  pub fn is_done(&self, habit_id: HabitId, date: NaiveDate) -> bool {
    self.get(habit_id, date).unwrap_or(false)
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<(HabitId, NaiveDate)> for StatusMap {
  fn from_iter<I: IntoIterator<Item = (HabitId, NaiveDate)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|key| (key, true)).collect())
  }
}
