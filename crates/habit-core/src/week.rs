//! Week ranges and the fixed-width completion grid.
//!
//! Rendering is a pure function of its inputs: the same habits, statuses and
//! range always produce byte-identical text.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::{habit::HabitSummary, log::StatusMap};

pub const DAYS_PER_WEEK: usize = 7;

/// Characters of a habit title shown in a grid row.
pub const TITLE_WIDTH: usize = 15;

pub const DONE_GLYPH: char = '🟩';
pub const NOT_DONE_GLYPH: char = '🟥';

// ─── Range ───────────────────────────────────────────────────────────────────

/// The seven consecutive dates of an ISO week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
  days: [NaiveDate; DAYS_PER_WEEK],
}

impl WeekRange {
  /// The week containing `reference`, or `None` when its Monday or Sunday
  /// falls outside [`NaiveDate::MIN`]..=[`NaiveDate::MAX`].
  pub fn containing(reference: NaiveDate) -> Option<Self> {
    let back = u64::from(reference.weekday().num_days_from_monday());
    let monday = reference.checked_sub_days(Days::new(back))?;
    monday.checked_add_days(Days::new(DAYS_PER_WEEK as u64 - 1))?;
    Some(Self {
      days: std::array::from_fn(|i| monday + Days::new(i as u64)),
    })
  }

  pub fn days(&self) -> &[NaiveDate; DAYS_PER_WEEK] { &self.days }

  pub fn first(&self) -> NaiveDate { self.days[0] }

  pub fn last(&self) -> NaiveDate { self.days[DAYS_PER_WEEK - 1] }

  pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
    self.days.iter().copied()
  }
}

// ─── Grid ────────────────────────────────────────────────────────────────────

fn day_letter(day: Weekday) -> char {
  match day {
    Weekday::Mon => 'M',
    Weekday::Tue | Weekday::Thu => 'T',
    Weekday::Wed => 'W',
    Weekday::Fri => 'F',
    Weekday::Sat | Weekday::Sun => 'S',
  }
}

/// Render `habits` against `statuses` as a text table.
///
/// Layout: a `Week DD Mon - DD Mon` header, a row of day initials aligned
/// over the glyph columns, then one row per habit in the given order.
pub fn render_grid(
  habits:   &[HabitSummary],
  statuses: &StatusMap,
  range:    &WeekRange,
) -> String {
  let mut lines = Vec::with_capacity(habits.len() + 2);

  lines.push(format!(
    "Week {} - {}",
    range.first().format("%d %b"),
    range.last().format("%d %b"),
  ));

  let initials: String = range
    .iter()
    .map(|d| format!(" {}", day_letter(d.weekday())))
    .collect();
  lines.push(format!("{:width$}{initials}", "", width = TITLE_WIDTH + 1));

  for habit in habits {
    let title: String = habit.title.chars().take(TITLE_WIDTH).collect();
    let cells: String = range
      .iter()
      .map(|d| {
        if statuses.is_done(habit.habit_id, d) { DONE_GLYPH } else { NOT_DONE_GLYPH }
      })
      .collect();
    lines.push(format!("{title:<width$} {cells}", width = TITLE_WIDTH));
  }

  lines.join("\n")
}
