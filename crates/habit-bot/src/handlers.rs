//! Command and button handlers.
//!
//! Every handler has the [`Handler`](crate::dispatch::Handler) shape so it can
//! sit in the dispatcher's routing table.

use habit_core::{
  habit::{HabitId, HabitTitle},
  log::ToggleOutcome,
  store::HabitStore,
  user::UserId,
  week::WeekRange,
};

use crate::{
  dispatch::{HandlerFuture, Invocation, Services},
  error::{Error, Result},
  session::ChatState,
  update::Reply,
  view::{
    ASK_TITLE, HELP_TEXT, NO_HABITS, NOTHING_TO_DELETE, PICK_TO_DELETE, PICK_TO_TOGGLE,
    added_text, delete_keyboard, done_keyboard, main_menu, week_message,
  },
};

// ─── Commands ────────────────────────────────────────────────────────────────

/// `/start` — help text and the main menu.
pub fn start<S: HabitStore>(_services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move { Ok(vec![Reply::with_markup(inv.chat_id, HELP_TEXT, main_menu())]) })
}

/// `/add` — wait for the next free-text message as a habit title.
pub fn add<S: HabitStore>(services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move {
    services.sessions.set(inv.user_id, ChatState::AwaitingHabitTitle);
    Ok(vec![Reply::text(inv.chat_id, ASK_TITLE)])
  })
}

/// Free text while awaiting a title. A too-short title leaves the prompt open.
pub fn habit_title<S: HabitStore>(services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move {
    let title = HabitTitle::parse(&inv.argument)?;
    let shown = title.to_string();

    let habit_id = services
      .store
      .add_habit(inv.user_id, title)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    services.sessions.clear(inv.user_id);
    tracing::info!(user_id = %inv.user_id, %habit_id, "habit added");

    Ok(vec![
      Reply::with_markup(inv.chat_id, added_text(habit_id, &shown), main_menu()),
      week_view(services, inv.user_id, inv.chat_id).await?,
    ])
  })
}

/// `/done` — one toggle button per habit, marked with today's state.
pub fn done<S: HabitStore>(services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move {
    let habits = services
      .store
      .list_active_habits(inv.user_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    if habits.is_empty() {
      return Ok(vec![Reply::text(inv.chat_id, NO_HABITS)]);
    }

    let today = services.clock.today();
    let ids: Vec<HabitId> = habits.iter().map(|h| h.habit_id).collect();
    let statuses = services
      .store
      .fetch_statuses(&ids, &[today])
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    Ok(vec![Reply::with_markup(
      inv.chat_id,
      PICK_TO_TOGGLE,
      done_keyboard(&habits, &statuses, today),
    )])
  })
}

/// `/delete` — one delete button per habit.
pub fn delete<S: HabitStore>(services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move {
    let habits = services
      .store
      .list_active_habits(inv.user_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    if habits.is_empty() {
      return Ok(vec![Reply::text(inv.chat_id, NOTHING_TO_DELETE)]);
    }
    Ok(vec![Reply::with_markup(inv.chat_id, PICK_TO_DELETE, delete_keyboard(&habits))])
  })
}

/// `/week` — the completion grid for the current week.
pub fn week<S: HabitStore>(services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move { Ok(vec![week_view(services, inv.user_id, inv.chat_id).await?]) })
}

// ─── Buttons ─────────────────────────────────────────────────────────────────

/// `done:<id>` — flip today's done state.
pub fn done_button<S: HabitStore>(services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move {
    let habit_id = parse_habit_id(&inv.argument)?;
    let today = services.clock.today();

    let outcome = services
      .store
      .toggle_done(inv.user_id, habit_id, today)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    let (toast, confirmation) = match outcome {
      ToggleOutcome::Marked => ("Saved", "Marked done for today ✅"),
      ToggleOutcome::Removed => ("Removed", "Removed done mark for today ↩️"),
      ToggleOutcome::NotFound => return Err(habit_core::Error::HabitNotFound(habit_id).into()),
    };

    Ok(vec![
      Reply::toast(inv.callback_id.unwrap_or_default(), toast),
      Reply::text(inv.chat_id, confirmation),
      week_view(services, inv.user_id, inv.chat_id).await?,
    ])
  })
}

/// `delete:<id>` — soft-delete the habit.
pub fn delete_button<S: HabitStore>(services: &Services<S>, inv: Invocation) -> HandlerFuture<'_> {
  Box::pin(async move {
    let habit_id = parse_habit_id(&inv.argument)?;

    let deleted = services
      .store
      .deactivate_habit(inv.user_id, habit_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    if !deleted {
      return Err(habit_core::Error::HabitNotFound(habit_id).into());
    }
    tracing::info!(user_id = %inv.user_id, %habit_id, "habit deactivated");

    Ok(vec![
      Reply::toast(inv.callback_id.unwrap_or_default(), "Deleted"),
      Reply::text(inv.chat_id, "Habit deleted 🗑️"),
      week_view(services, inv.user_id, inv.chat_id).await?,
    ])
  })
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn parse_habit_id(payload: &str) -> Result<HabitId> {
  payload
    .trim()
    .parse()
    .map(HabitId)
    .map_err(|_| Error::InvalidPayload(payload.to_owned()))
}

/// The week grid, or the "no habits" hint when there is nothing to show.
async fn week_view<S: HabitStore>(
  services: &Services<S>,
  user_id:  UserId,
  chat_id:  i64,
) -> Result<Reply> {
  let habits = services
    .store
    .list_active_habits(user_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  if habits.is_empty() {
    return Ok(Reply::text(chat_id, NO_HABITS));
  }

  let today = services.clock.today();
  let range = WeekRange::containing(today).ok_or(habit_core::Error::DateOutOfRange(today))?;
  let ids: Vec<HabitId> = habits.iter().map(|h| h.habit_id).collect();
  let statuses = services
    .store
    .fetch_statuses(&ids, range.days())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(week_message(chat_id, &habits, &statuses, &range))
}
