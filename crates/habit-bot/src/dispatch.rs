//! Routing of inbound updates to handlers.
//!
//! The [`Dispatcher`] owns an explicit table from command names and button
//! payload prefixes to handler functions. It is built once at startup and
//! shared through [`crate::AppState`].

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use habit_core::{store::HabitStore, user::{ExternalId, UserId}};

use crate::{
  clock::Clock,
  error::{Error, Result},
  handlers,
  session::{ChatState, SessionStore},
  update::{Reply, Sender, Update},
  view::{DELETE_PREFIX, DONE_PREFIX, GENERIC_FAILURE, HABIT_NOT_FOUND, INVALID_HABIT, TITLE_TOO_SHORT},
};

// ─── Handler plumbing ────────────────────────────────────────────────────────

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Reply>>> + Send + 'a>>;

/// A routed handler. Receives the shared services and the resolved call.
pub type Handler<S> = for<'a> fn(&'a Services<S>, Invocation) -> HandlerFuture<'a>;

/// Everything a handler may touch.
pub struct Services<S> {
  pub store:    Arc<S>,
  pub sessions: SessionStore,
  pub clock:    Arc<dyn Clock>,
}

/// One routed interaction, after identity resolution.
#[derive(Debug, Clone)]
pub struct Invocation {
  pub user_id:     UserId,
  pub chat_id:     i64,
  /// Command arguments, free text, or the button payload after its prefix.
  pub argument:    String,
  /// Set when the interaction is a button press.
  pub callback_id: Option<String>,
}

// ─── Incoming ────────────────────────────────────────────────────────────────

enum Incoming {
  Text {
    chat_id: i64,
    sender:  Sender,
    text:    String,
  },
  Button {
    chat_id:     i64,
    sender:      Sender,
    callback_id: String,
    data:        String,
  },
}

impl Incoming {
  fn from_update(update: Update) -> Option<Self> {
    if let Some(cb) = update.callback_query {
      // Private chats share their id with the user.
      let chat_id = cb.message.map_or(cb.from.id, |m| m.chat.id);
      return Some(Self::Button {
        chat_id,
        sender:      cb.from,
        callback_id: cb.id,
        data:        cb.data.unwrap_or_default(),
      });
    }
    let message = update.message?;
    Some(Self::Text {
      chat_id: message.chat.id,
      sender:  message.from?,
      text:    message.text.unwrap_or_default(),
    })
  }

  fn sender(&self) -> &Sender {
    match self {
      Self::Text { sender, .. } | Self::Button { sender, .. } => sender,
    }
  }

  /// A non-fatal notice: an alert for button presses, a message otherwise.
  fn notice(&self, text: &str) -> Vec<Reply> {
    match self {
      Self::Text { chat_id, .. } => vec![Reply::text(*chat_id, text)],
      Self::Button { callback_id, .. } => vec![Reply::alert(callback_id.as_str(), text)],
    }
  }
}

/// Split `/name@bot args` into `("name", "args")`.
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
  let rest = text.trim_start().strip_prefix('/')?;
  let (head, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
  let name = head.split_once('@').map_or(head, |(name, _bot)| name);
  if name.is_empty() {
    return None;
  }
  Some((name, args.trim()))
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

pub struct Dispatcher<S> {
  services: Services<S>,
  commands: HashMap<&'static str, Handler<S>>,
  buttons:  Vec<(&'static str, Handler<S>)>,
  on_title: Handler<S>,
}

impl<S: HabitStore + 'static> Dispatcher<S> {
  /// Build the routing table for the bot's commands and buttons.
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self {
      services: Services { store, sessions: SessionStore::new(), clock },
      commands: HashMap::new(),
      buttons:  Vec::new(),
      on_title: handlers::habit_title::<S>,
    }
    .command("start", handlers::start::<S>)
    .command("add", handlers::add::<S>)
    .command("done", handlers::done::<S>)
    .command("delete", handlers::delete::<S>)
    .command("week", handlers::week::<S>)
    .button(DONE_PREFIX, handlers::done_button::<S>)
    .button(DELETE_PREFIX, handlers::delete_button::<S>)
  }

  fn command(mut self, name: &'static str, handler: Handler<S>) -> Self {
    self.commands.insert(name, handler);
    self
  }

  fn button(mut self, prefix: &'static str, handler: Handler<S>) -> Self {
    self.buttons.push((prefix, handler));
    self
  }

  pub fn services(&self) -> &Services<S> { &self.services }

  /// Resolve the sender, route the update, and collect the replies.
  ///
  /// Never fails: handler errors become user-facing notices, and storage
  /// errors are logged and reported generically.
  pub async fn dispatch(&self, update: Update) -> Vec<Reply> {
    let update_id = update.update_id;
    let Some(incoming) = Incoming::from_update(update) else {
      tracing::debug!(update_id, "ignoring update without a sender");
      return Vec::new();
    };

    let sender = incoming.sender();
    let user_id = match self
      .services
      .store
      .resolve_user(ExternalId(sender.id), sender.username.clone())
      .await
    {
      Ok(id) => id,
      Err(e) => {
        tracing::error!(update_id, error = %e, "failed to resolve user");
        return incoming.notice(GENERIC_FAILURE);
      }
    };

    let Some((handler, invocation)) = self.route(&incoming, user_id) else {
      return Vec::new();
    };

    match handler(&self.services, invocation).await {
      Ok(replies) => replies,
      Err(e) => error_replies(&incoming, e),
    }
  }

  fn route(&self, incoming: &Incoming, user_id: UserId) -> Option<(Handler<S>, Invocation)> {
    match incoming {
      Incoming::Button { chat_id, callback_id, data, .. } => {
        let Some((handler, rest)) = self
          .buttons
          .iter()
          .find_map(|(prefix, h)| data.strip_prefix(prefix).map(|rest| (*h, rest)))
        else {
          tracing::debug!(%user_id, data = %data, "unrouted button payload");
          return None;
        };
        Some((handler, Invocation {
          user_id,
          chat_id:     *chat_id,
          argument:    rest.to_owned(),
          callback_id: Some(callback_id.clone()),
        }))
      }
      Incoming::Text { chat_id, text, .. } => {
        if let Some((name, args)) = parse_command(text) {
          let Some(handler) = self.commands.get(name) else {
            tracing::debug!(%user_id, command = name, "unknown command");
            return None;
          };
          // A command abandons any pending prompt.
          self.services.sessions.clear(user_id);
          tracing::debug!(%user_id, command = name, "dispatching command");
          return Some((*handler, Invocation {
            user_id,
            chat_id:     *chat_id,
            argument:    args.to_owned(),
            callback_id: None,
          }));
        }

        match self.services.sessions.get(user_id) {
          ChatState::AwaitingHabitTitle => Some((self.on_title, Invocation {
            user_id,
            chat_id:     *chat_id,
            argument:    text.clone(),
            callback_id: None,
          })),
          ChatState::Idle => {
            tracing::debug!(%user_id, "ignoring free text outside a prompt");
            None
          }
        }
      }
    }
  }
}

fn error_replies(incoming: &Incoming, error: Error) -> Vec<Reply> {
  let text = match &error {
    Error::Core(habit_core::Error::TitleTooShort { .. }) => TITLE_TOO_SHORT,
    Error::Core(habit_core::Error::HabitNotFound(_)) => HABIT_NOT_FOUND,
    Error::InvalidPayload(_) => INVALID_HABIT,
    Error::Core(habit_core::Error::DateOutOfRange(_)) | Error::Store(_) => {
      tracing::error!(error = %error, "handler failed");
      GENERIC_FAILURE
    }
    // Only the webhook extractor raises this; handlers never do.
    Error::Unauthorized => {
      tracing::warn!("unauthorized error reached the dispatcher");
      GENERIC_FAILURE
    }
  };
  incoming.notice(text)
}
