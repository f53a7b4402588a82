//! Per-user conversation state.
//!
//! Multi-step flows are modelled as an explicit state value per internal user
//! id rather than a suspended coroutine. The store is process-local and
//! transient: a restart drops pending prompts.

use std::{
  collections::HashMap,
  sync::{Mutex, PoisonError},
};

use habit_core::user::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
  #[default]
  Idle,
  /// `/add` was sent; the next free-text message is the habit title.
  AwaitingHabitTitle,
}

#[derive(Debug, Default)]
pub struct SessionStore {
  states: Mutex<HashMap<UserId, ChatState>>,
}

impl SessionStore {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, user_id: UserId) -> ChatState {
    self
      .states
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(&user_id)
      .copied()
      .unwrap_or_default()
  }

  pub fn set(&self, user_id: UserId, state: ChatState) {
    let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
    match state {
      ChatState::Idle => states.remove(&user_id),
      other => states.insert(user_id, other),
    };
  }

  /// Reset to [`ChatState::Idle`]; returns the state that was cleared.
  pub fn clear(&self, user_id: UserId) -> ChatState {
    self
      .states
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&user_id)
      .unwrap_or_default()
  }
}
