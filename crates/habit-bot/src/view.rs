//! Message texts and keyboards shown to the user.

use chrono::NaiveDate;
use habit_core::{
  habit::{HabitId, HabitSummary},
  log::StatusMap,
  week::{WeekRange, render_grid},
};

use crate::update::{InlineButton, KeyboardButton, Reply, ReplyMarkup};

pub const DONE_PREFIX: &str = "done:";
pub const DELETE_PREFIX: &str = "delete:";

pub const HELP_TEXT: &str = "Habit tracker bot.\n\n\
Commands:\n\
/add - add a new habit\n\
/done - mark a habit done today\n\
/delete - delete a habit\n\
/week - weekly matrix";

pub const ASK_TITLE: &str = "Send habit name (example: Water 2L)";
pub const TITLE_TOO_SHORT: &str = "Habit name is too short. Try again.";
pub const NO_HABITS: &str = "No habits yet. Use /add first.";
pub const NOTHING_TO_DELETE: &str = "No habits to delete.";
pub const PICK_TO_TOGGLE: &str = "Toggle done for today (tap again to undo):";
pub const PICK_TO_DELETE: &str = "Pick a habit to delete:";
pub const HABIT_NOT_FOUND: &str = "Habit not found";
pub const INVALID_HABIT: &str = "Invalid habit";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// The persistent reply keyboard with the four main commands.
pub fn main_menu() -> ReplyMarkup {
  let row = |a: &str, b: &str| {
    vec![
      KeyboardButton { text: a.to_owned() },
      KeyboardButton { text: b.to_owned() },
    ]
  };
  ReplyMarkup::Keyboard {
    keyboard:        vec![row("/add", "/done"), row("/delete", "/week")],
    resize_keyboard: true,
  }
}

fn one_per_row(buttons: impl Iterator<Item = InlineButton>) -> ReplyMarkup {
  ReplyMarkup::Inline { inline_keyboard: buttons.map(|b| vec![b]).collect() }
}

/// Toggle buttons for `today`: `✅` when already done, `⬜` otherwise.
pub fn done_keyboard(habits: &[HabitSummary], statuses: &StatusMap, today: NaiveDate) -> ReplyMarkup {
  one_per_row(habits.iter().map(|h| {
    let marker = if statuses.is_done(h.habit_id, today) { '✅' } else { '⬜' };
    InlineButton {
      text:          format!("{marker} {}", h.title),
      callback_data: format!("{DONE_PREFIX}{}", h.habit_id),
    }
  }))
}

pub fn delete_keyboard(habits: &[HabitSummary]) -> ReplyMarkup {
  one_per_row(habits.iter().map(|h| InlineButton {
    text:          format!("❌ {}", h.title),
    callback_data: format!("{DELETE_PREFIX}{}", h.habit_id),
  }))
}

/// The weekly grid as a preformatted HTML message.
pub fn week_message(
  chat_id:  i64,
  habits:   &[HabitSummary],
  statuses: &StatusMap,
  range:    &WeekRange,
) -> Reply {
  let grid = render_grid(habits, statuses, range);
  Reply::html(chat_id, format!("<pre>{}</pre>", escape_html(&grid)))
}

pub fn added_text(habit_id: HabitId, title: &str) -> String {
  format!("Added habit #{habit_id}: {title}")
}

/// Escape the three characters Telegram's HTML mode treats as markup.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      c => out.push(c),
    }
  }
  out
}
