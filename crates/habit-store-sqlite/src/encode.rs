//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`
//! so that text comparison matches date order.

use chrono::{DateTime, NaiveDate, Utc};
use habit_core::{
  habit::{Habit, HabitId},
  user::{ExternalId, User, UserId},
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:           i64,
  pub external_id:  i64,
  pub display_name: Option<String>,
  pub created_at:   String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:      UserId(self.id),
      external_id:  ExternalId(self.external_id),
      display_name: self.display_name,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `habits` row.
pub struct RawHabit {
  pub id:         i64,
  pub user_id:    i64,
  pub title:      String,
  pub is_active:  bool,
  pub created_at: String,
}

impl RawHabit {
  pub fn into_habit(self) -> Result<Habit> {
    Ok(Habit {
      habit_id:   HabitId(self.id),
      user_id:    UserId(self.user_id),
      title:      self.title,
      is_active:  self.is_active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from a `habit_logs` status query.
pub struct RawLog {
  pub habit_id: i64,
  pub log_date: String,
}

impl RawLog {
  pub fn into_key(self) -> Result<(HabitId, NaiveDate)> {
    Ok((HabitId(self.habit_id), decode_date(&self.log_date)?))
  }
}
