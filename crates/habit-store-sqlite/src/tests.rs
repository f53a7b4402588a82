//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Days, NaiveDate};
use habit_core::{
  habit::{HabitId, HabitTitle},
  log::ToggleOutcome,
  store::HabitStore,
  user::{ExternalId, UserId},
  week::WeekRange,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn title(s: &str) -> HabitTitle { HabitTitle::parse(s).unwrap() }

fn temp_db_path(tag: &str) -> std::path::PathBuf {
  let path = std::env::temp_dir().join(format!(
    "habit-store-test-{}-{tag}.sqlite3",
    std::process::id(),
  ));
  remove_db(&path);
  path
}

fn remove_db(path: &std::path::Path) {
  let _ = std::fs::remove_file(path);
  for suffix in ["-wal", "-shm"] {
    let mut side = path.as_os_str().to_owned();
    side.push(suffix);
    let _ = std::fs::remove_file(side);
  }
}

async fn user(s: &SqliteStore, external: i64) -> UserId {
  s.resolve_user(ExternalId(external), Some(format!("user{external}")))
    .await
    .unwrap()
}

// ─── Identity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_user_creates_on_first_contact() {
  let s = store().await;

  let id = s.resolve_user(ExternalId(42), Some("alice".into())).await.unwrap();
  let fetched = s.get_user(id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, id);
  assert_eq!(fetched.external_id, ExternalId(42));
  assert_eq!(fetched.display_name.as_deref(), Some("alice"));
}

#[tokio::test]
async fn resolve_user_is_stable_and_overwrites_display_name() {
  let s = store().await;

  let first  = s.resolve_user(ExternalId(42), Some("alice".into())).await.unwrap();
  let second = s.resolve_user(ExternalId(42), Some("alice_w".into())).await.unwrap();
  assert_eq!(first, second);

  let fetched = s.get_user(first).await.unwrap().unwrap();
  assert_eq!(fetched.display_name.as_deref(), Some("alice_w"));

  // A missing handle overwrites too.
  s.resolve_user(ExternalId(42), None).await.unwrap();
  let fetched = s.get_user(first).await.unwrap().unwrap();
  assert_eq!(fetched.display_name, None);
}

#[tokio::test]
async fn distinct_external_ids_get_distinct_users() {
  let s = store().await;
  let a = user(&s, 1).await;
  let b = user(&s, 2).await;
  assert_ne!(a, b);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(UserId(999)).await.unwrap().is_none());
}

// ─── Habits ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn added_habit_is_listed_exactly_once() {
  let s = store().await;
  let u = user(&s, 1).await;

  let id = s.add_habit(u, title("  Water 2L ")).await.unwrap();

  let habits = s.list_active_habits(u).await.unwrap();
  let matching: Vec<_> = habits.iter().filter(|h| h.title == "Water 2L").collect();
  assert_eq!(matching.len(), 1);
  assert_eq!(matching[0].habit_id, id);
}

#[tokio::test]
async fn new_user_has_no_habits() {
  let s = store().await;
  let u = user(&s, 1).await;
  assert!(s.list_active_habits(u).await.unwrap().is_empty());
}

#[tokio::test]
async fn habits_are_listed_in_creation_order() {
  let s = store().await;
  let u = user(&s, 1).await;

  let a = s.add_habit(u, title("Read")).await.unwrap();
  let b = s.add_habit(u, title("Stretch")).await.unwrap();
  let c = s.add_habit(u, title("Journal")).await.unwrap();

  let ids: Vec<HabitId> = s
    .list_active_habits(u)
    .await
    .unwrap()
    .into_iter()
    .map(|h| h.habit_id)
    .collect();
  assert_eq!(ids, vec![a, b, c]);
}

#[tokio::test]
async fn habits_are_scoped_to_their_owner() {
  let s = store().await;
  let u1 = user(&s, 1).await;
  let u2 = user(&s, 2).await;

  s.add_habit(u1, title("Read")).await.unwrap();

  assert_eq!(s.list_active_habits(u1).await.unwrap().len(), 1);
  assert!(s.list_active_habits(u2).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_habit_returns_full_record() {
  let s = store().await;
  let u = user(&s, 1).await;
  let id = s.add_habit(u, title("Read")).await.unwrap();

  let habit = s.get_habit(id).await.unwrap().unwrap();
  assert_eq!(habit.user_id, u);
  assert_eq!(habit.title, "Read");
  assert!(habit.is_active);

  assert!(s.get_habit(HabitId(12345)).await.unwrap().is_none());
}

// ─── Deactivation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn deactivate_is_idempotent() {
  let s = store().await;
  let u = user(&s, 1).await;
  let id = s.add_habit(u, title("Read")).await.unwrap();

  assert!(s.deactivate_habit(u, id).await.unwrap());
  assert!(!s.deactivate_habit(u, id).await.unwrap());

  assert!(s.list_active_habits(u).await.unwrap().is_empty());

  // Soft delete: the row survives.
  let habit = s.get_habit(id).await.unwrap().unwrap();
  assert!(!habit.is_active);
}

#[tokio::test]
async fn deactivate_rejects_other_users() {
  let s = store().await;
  let u1 = user(&s, 1).await;
  let u2 = user(&s, 2).await;
  let h2 = s.add_habit(u1, title("Read")).await.unwrap();

  assert!(!s.deactivate_habit(u2, h2).await.unwrap());

  let visible = s.list_active_habits(u1).await.unwrap();
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].habit_id, h2);
}

#[tokio::test]
async fn deactivate_missing_habit_returns_false() {
  let s = store().await;
  let u = user(&s, 1).await;
  assert!(!s.deactivate_habit(u, HabitId(77)).await.unwrap());
}

#[tokio::test]
async fn deactivation_keeps_completion_logs() {
  let s = store().await;
  let u = user(&s, 1).await;
  let id = s.add_habit(u, title("Read")).await.unwrap();
  let day = ymd(2024, 1, 1);

  s.mark_done(u, id, day).await.unwrap();
  s.deactivate_habit(u, id).await.unwrap();

  let statuses = s.fetch_statuses(&[id], &[day]).await.unwrap();
  assert!(statuses.is_done(id, day));
}

// ─── Toggle ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_marks_then_removes() {
  let s = store().await;
  let u = user(&s, 1).await;
  let h1 = s.add_habit(u, title("Water 2L")).await.unwrap();
  let day = ymd(2024, 1, 1);

  assert_eq!(s.toggle_done(u, h1, day).await.unwrap(), ToggleOutcome::Marked);
  let statuses = s.fetch_statuses(&[h1], &[day]).await.unwrap();
  assert_eq!(statuses.len(), 1);
  assert_eq!(statuses.get(h1, day), Some(true));

  assert_eq!(s.toggle_done(u, h1, day).await.unwrap(), ToggleOutcome::Removed);
  let statuses = s.fetch_statuses(&[h1], &[day]).await.unwrap();
  assert!(statuses.is_empty());
}

#[tokio::test]
async fn toggle_alternates_over_many_calls() {
  let s = store().await;
  let u = user(&s, 1).await;
  let h = s.add_habit(u, title("Run")).await.unwrap();
  let day = ymd(2024, 6, 3);

  for i in 0..6 {
    let expected = if i % 2 == 0 { ToggleOutcome::Marked } else { ToggleOutcome::Removed };
    assert_eq!(s.toggle_done(u, h, day).await.unwrap(), expected);
  }
  assert!(s.fetch_statuses(&[h], &[day]).await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_is_scoped_to_date() {
  let s = store().await;
  let u = user(&s, 1).await;
  let h = s.add_habit(u, title("Run")).await.unwrap();

  s.toggle_done(u, h, ymd(2024, 1, 1)).await.unwrap();
  s.toggle_done(u, h, ymd(2024, 1, 2)).await.unwrap();
  s.toggle_done(u, h, ymd(2024, 1, 1)).await.unwrap();

  let statuses = s
    .fetch_statuses(&[h], &[ymd(2024, 1, 1), ymd(2024, 1, 2)])
    .await
    .unwrap();
  assert!(!statuses.is_done(h, ymd(2024, 1, 1)));
  assert!(statuses.is_done(h, ymd(2024, 1, 2)));
}

#[tokio::test]
async fn toggle_unknown_foreign_or_inactive_is_not_found() {
  let s = store().await;
  let u1 = user(&s, 1).await;
  let u2 = user(&s, 2).await;
  let h = s.add_habit(u1, title("Run")).await.unwrap();
  let day = ymd(2024, 1, 1);

  assert_eq!(s.toggle_done(u1, HabitId(999), day).await.unwrap(), ToggleOutcome::NotFound);
  assert_eq!(s.toggle_done(u2, h, day).await.unwrap(), ToggleOutcome::NotFound);

  s.deactivate_habit(u1, h).await.unwrap();
  assert_eq!(s.toggle_done(u1, h, day).await.unwrap(), ToggleOutcome::NotFound);

  assert!(s.fetch_statuses(&[h], &[day]).await.unwrap().is_empty());
}

#[tokio::test]
async fn racing_toggles_on_two_connections_serialize() {
  let path = temp_db_path("racing-toggles");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();
  let u = user(&a, 1).await;
  let h = a.add_habit(u, title("Run")).await.unwrap();
  let day = ymd(2024, 1, 1);

  for round in 0..50 {
    let (x, y) = tokio::join!(a.toggle_done(u, h, day), b.toggle_done(u, h, day));
    let (x, y) = (x.unwrap(), y.unwrap());
    assert!(
      matches!(
        (x, y),
        (ToggleOutcome::Marked, ToggleOutcome::Removed)
          | (ToggleOutcome::Removed, ToggleOutcome::Marked)
      ),
      "round {round}: {x:?} / {y:?}"
    );
  }

  // Every round flipped twice, so the pair ends undone on both connections.
  assert!(a.fetch_statuses(&[h], &[day]).await.unwrap().is_empty());
  assert!(b.fetch_statuses(&[h], &[day]).await.unwrap().is_empty());

  drop((a, b));
  remove_db(&path);
}

#[tokio::test]
async fn joined_marks_keep_a_single_row() {
  let s = store().await;
  let u = user(&s, 1).await;
  let h = s.add_habit(u, title("Run")).await.unwrap();
  let day = ymd(2024, 1, 1);

  let (a, b) = tokio::join!(s.mark_done(u, h, day), s.mark_done(u, h, day));
  assert!(a.unwrap());
  assert!(b.unwrap());

  let statuses = s.fetch_statuses(&[h], &[day]).await.unwrap();
  assert_eq!(statuses.len(), 1);
}

// ─── Mark ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mark_done_is_idempotent() {
  let s = store().await;
  let u = user(&s, 1).await;
  let h = s.add_habit(u, title("Run")).await.unwrap();
  let day = ymd(2024, 1, 1);

  assert!(s.mark_done(u, h, day).await.unwrap());
  assert!(s.mark_done(u, h, day).await.unwrap());

  let statuses = s.fetch_statuses(&[h], &[day]).await.unwrap();
  assert_eq!(statuses.len(), 1);

  // A toggle after marking removes the single row.
  assert_eq!(s.toggle_done(u, h, day).await.unwrap(), ToggleOutcome::Removed);
}

#[tokio::test]
async fn mark_done_rejects_foreign_and_inactive() {
  let s = store().await;
  let u1 = user(&s, 1).await;
  let u2 = user(&s, 2).await;
  let h = s.add_habit(u1, title("Run")).await.unwrap();
  let day = ymd(2024, 1, 1);

  assert!(!s.mark_done(u2, h, day).await.unwrap());
  s.deactivate_habit(u1, h).await.unwrap();
  assert!(!s.mark_done(u1, h, day).await.unwrap());
  assert!(s.fetch_statuses(&[h], &[day]).await.unwrap().is_empty());
}

// ─── Statuses ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_statuses_with_no_habits_is_empty() {
  let s = store().await;
  let range = WeekRange::containing(ymd(2024, 1, 3)).unwrap();
  let statuses = s.fetch_statuses(&[], range.days()).await.unwrap();
  assert!(statuses.is_empty());
}

#[tokio::test]
async fn fetch_statuses_covers_the_whole_week_only() {
  let s = store().await;
  let u = user(&s, 1).await;
  let a = s.add_habit(u, title("Read")).await.unwrap();
  let b = s.add_habit(u, title("Run")).await.unwrap();
  let range = WeekRange::containing(ymd(2024, 1, 3)).unwrap();

  s.mark_done(u, a, range.first()).await.unwrap();
  s.mark_done(u, b, range.last()).await.unwrap();
  // Outside the week on both sides.
  s.mark_done(u, a, range.first() - Days::new(1)).await.unwrap();
  s.mark_done(u, b, range.last() + Days::new(1)).await.unwrap();

  let statuses = s.fetch_statuses(&[a, b], range.days()).await.unwrap();
  assert_eq!(statuses.len(), 2);
  assert!(statuses.is_done(a, range.first()));
  assert!(statuses.is_done(b, range.last()));
}

#[tokio::test]
async fn fetch_statuses_ignores_unrequested_habits() {
  let s = store().await;
  let u = user(&s, 1).await;
  let a = s.add_habit(u, title("Read")).await.unwrap();
  let b = s.add_habit(u, title("Run")).await.unwrap();
  let day = ymd(2024, 1, 1);

  s.mark_done(u, a, day).await.unwrap();
  s.mark_done(u, b, day).await.unwrap();

  let statuses = s.fetch_statuses(&[b], &[day]).await.unwrap();
  assert_eq!(statuses.len(), 1);
  assert!(statuses.is_done(b, day));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_store_keeps_data() {
  let path = temp_db_path("reopen");

  let h = {
    let s = SqliteStore::open(&path).await.unwrap();
    let u = user(&s, 1).await;
    let h = s.add_habit(u, title("Read")).await.unwrap();
    s.mark_done(u, h, ymd(2024, 1, 1)).await.unwrap();
    h
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let u = user(&s, 1).await;
  let habits = s.list_active_habits(u).await.unwrap();
  assert_eq!(habits.len(), 1);
  assert_eq!(habits[0].habit_id, h);
  assert!(s.fetch_statuses(&[h], &[ymd(2024, 1, 1)]).await.unwrap().is_done(h, ymd(2024, 1, 1)));

  drop(s);
  remove_db(&path);
}
