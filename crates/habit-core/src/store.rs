//! The `HabitStore` trait — the access protocol every backend implements.
//!
//! The trait is implemented by storage backends (e.g. `habit-store-sqlite`).
//! The chat layer (`habit-bot`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  habit::{Habit, HabitId, HabitSummary, HabitTitle},
  log::{StatusMap, ToggleOutcome},
  user::{ExternalId, User, UserId},
};

/// Abstraction over a habit store backend.
///
/// Every operation is a single short storage call; no connection or lock is
/// held between calls. Operations scoped by `user_id` treat habits owned by
/// other users exactly like missing ones.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait HabitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identity ──────────────────────────────────────────────────────────

  /// Map an external account to its internal user, creating the user on
  /// first contact. The stored display name is overwritten every call.
  fn resolve_user(
    &self,
    external_id: ExternalId,
    display_name: Option<String>,
  ) -> impl Future<Output = Result<UserId, Self::Error>> + Send + '_;

  /// Retrieve a user by internal id. Returns `None` if not found.
  fn get_user(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Habits ────────────────────────────────────────────────────────────

  /// Persist a new active habit for `user_id` and return its id.
  fn add_habit(
    &self,
    user_id: UserId,
    title: HabitTitle,
  ) -> impl Future<Output = Result<HabitId, Self::Error>> + Send + '_;

  /// Retrieve a habit by id, active or not. Returns `None` if not found.
  fn get_habit(
    &self,
    habit_id: HabitId,
  ) -> impl Future<Output = Result<Option<Habit>, Self::Error>> + Send + '_;

  /// Active habits of `user_id` in creation order.
  fn list_active_habits(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<HabitSummary>, Self::Error>> + Send + '_;

  /// Soft-delete a habit. Returns `true` only if an active habit owned by
  /// `user_id` was switched off; completion logs are kept.
  fn deactivate_habit(
    &self,
    user_id: UserId,
    habit_id: HabitId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Completion log ────────────────────────────────────────────────────

  /// Idempotently mark `habit_id` done on `date`. Returns `false` if the
  /// habit is not an active habit of `user_id`.
  fn mark_done(
    &self,
    user_id: UserId,
    habit_id: HabitId,
    date: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Flip the done state of (`habit_id`, `date`) atomically.
  fn toggle_done(
    &self,
    user_id: UserId,
    habit_id: HabitId,
    date: NaiveDate,
  ) -> impl Future<Output = Result<ToggleOutcome, Self::Error>> + Send + '_;

  /// Done pairs for `habit_ids` between the first and last of `days`
  /// (inclusive). Empty inputs yield an empty map without touching storage.
  fn fetch_statuses<'a>(
    &'a self,
    habit_ids: &'a [HabitId],
    days: &'a [NaiveDate],
  ) -> impl Future<Output = Result<StatusMap, Self::Error>> + Send + 'a;
}
