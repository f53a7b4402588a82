//! [`SqliteStore`] — the SQLite implementation of [`HabitStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior, types::Value};

use habit_core::{
  habit::{Habit, HabitId, HabitSummary, HabitTitle},
  log::{StatusMap, ToggleOutcome},
  store::HabitStore,
  user::{ExternalId, User, UserId},
};

use crate::{
  Result,
  encode::{RawHabit, RawLog, RawUser, encode_date, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A habit store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── HabitStore impl ─────────────────────────────────────────────────────────

impl HabitStore for SqliteStore {
  type Error = crate::Error;

  // ── Identity ──────────────────────────────────────────────────────────────

  async fn resolve_user(
    &self,
    external_id:  ExternalId,
    display_name: Option<String>,
  ) -> Result<UserId> {
    let now = encode_dt(Utc::now());

    let id: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO users (external_id, display_name, created_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(external_id) DO UPDATE SET display_name = excluded.display_name
           RETURNING id",
          rusqlite::params![external_id.0, display_name, now],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(UserId(id))
  }

  async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, external_id, display_name, created_at FROM users WHERE id = ?1",
            rusqlite::params![user_id.0],
            |row| {
              Ok(RawUser {
                id:           row.get(0)?,
                external_id:  row.get(1)?,
                display_name: row.get(2)?,
                created_at:   row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Habits ────────────────────────────────────────────────────────────────

  async fn add_habit(&self, user_id: UserId, title: HabitTitle) -> Result<HabitId> {
    let title = title.into_inner();
    let now   = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO habits (user_id, title, is_active, created_at) VALUES (?1, ?2, 1, ?3)",
          rusqlite::params![user_id.0, title, now],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(HabitId(id))
  }

  async fn get_habit(&self, habit_id: HabitId) -> Result<Option<Habit>> {
    let raw: Option<RawHabit> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, user_id, title, is_active, created_at FROM habits WHERE id = ?1",
            rusqlite::params![habit_id.0],
            |row| {
              Ok(RawHabit {
                id:         row.get(0)?,
                user_id:    row.get(1)?,
                title:      row.get(2)?,
                is_active:  row.get(3)?,
                created_at: row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawHabit::into_habit).transpose()
  }

  async fn list_active_habits(&self, user_id: UserId) -> Result<Vec<HabitSummary>> {
    let habits = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, title
           FROM habits
           WHERE user_id = ?1 AND is_active = 1
           ORDER BY id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id.0], |row| {
            Ok(HabitSummary {
              habit_id: HabitId(row.get(0)?),
              title:    row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(habits)
  }

  async fn deactivate_habit(&self, user_id: UserId, habit_id: HabitId) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE habits SET is_active = 0
           WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
          rusqlite::params![habit_id.0, user_id.0],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Completion log ────────────────────────────────────────────────────────

  async fn mark_done(
    &self,
    user_id:  UserId,
    habit_id: HabitId,
    date:     NaiveDate,
  ) -> Result<bool> {
    let date_str = encode_date(date);
    let now      = encode_dt(Utc::now());

    // The WHERE clause on the SELECT is required by SQLite's upsert grammar.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO habit_logs (habit_id, log_date, done, created_at)
           SELECT h.id, ?1, 1, ?2
           FROM habits h
           WHERE h.id = ?3 AND h.user_id = ?4 AND h.is_active = 1
           ON CONFLICT(habit_id, log_date) DO UPDATE SET done = 1",
          rusqlite::params![date_str, now, habit_id.0, user_id.0],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn toggle_done(
    &self,
    user_id:  UserId,
    habit_id: HabitId,
    date:     NaiveDate,
  ) -> Result<ToggleOutcome> {
    let date_str = encode_date(date);
    let now      = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let owned = tx
          .query_row(
            "SELECT 1 FROM habits WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
            rusqlite::params![habit_id.0, user_id.0],
            |_| Ok(()),
          )
          .optional()?
          .is_some();

        if !owned {
          return Ok(ToggleOutcome::NotFound);
        }

        let removed = tx.execute(
          "DELETE FROM habit_logs WHERE habit_id = ?1 AND log_date = ?2 AND done = 1",
          rusqlite::params![habit_id.0, date_str],
        )?;

        let outcome = if removed > 0 {
          ToggleOutcome::Removed
        } else {
          tx.execute(
            "INSERT INTO habit_logs (habit_id, log_date, done, created_at)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(habit_id, log_date) DO UPDATE SET done = 1",
            rusqlite::params![habit_id.0, date_str, now],
          )?;
          ToggleOutcome::Marked
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn fetch_statuses(
    &self,
    habit_ids: &[HabitId],
    days:      &[NaiveDate],
  ) -> Result<StatusMap> {
    let (Some(first), Some(last)) = (days.iter().min(), days.iter().max()) else {
      return Ok(StatusMap::new());
    };
    if habit_ids.is_empty() {
      return Ok(StatusMap::new());
    }

    let placeholders = vec!["?"; habit_ids.len()].join(", ");
    let sql = format!(
      "SELECT habit_id, log_date
       FROM habit_logs
       WHERE habit_id IN ({placeholders})
         AND log_date BETWEEN ? AND ?
         AND done = 1"
    );

    let mut params: Vec<Value> = habit_ids.iter().map(|id| Value::Integer(id.0)).collect();
    params.push(Value::Text(encode_date(*first)));
    params.push(Value::Text(encode_date(*last)));

    let raws: Vec<RawLog> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok(RawLog {
              habit_id: row.get(0)?,
              log_date: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLog::into_key).collect()
  }
}
