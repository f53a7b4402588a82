//! Wire types exchanged with the chat transport.
//!
//! Inbound updates are a Telegram-shaped subset: a text message or a button
//! press (callback query). Outbound replies mirror the `sendMessage` and
//! `answerCallbackQuery` calls the transport performs on our behalf.

use serde::{Deserialize, Serialize};

// ─── Inbound ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id:      i64,
  pub message:        Option<Message>,
  pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub chat: Chat,
  /// Absent for channel posts.
  pub from: Option<Sender>,
  /// Absent for stickers, photos and other non-text messages.
  pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Chat {
  pub id: i64,
}

/// The account that produced an update.
#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
  pub id:       i64,
  pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
  pub id:      String,
  pub from:    Sender,
  pub data:    Option<String>,
  /// The message the pressed button was attached to.
  pub message: Option<Message>,
}

// ─── Outbound ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
  #[serde(rename = "HTML")]
  Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
  pub text:          String,
  pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
  pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
  /// Buttons attached to the message; presses arrive as callback queries.
  Inline { inline_keyboard: Vec<Vec<InlineButton>> },
  /// A persistent keyboard replacing the user's text keyboard.
  Keyboard {
    keyboard:        Vec<Vec<KeyboardButton>>,
    resize_keyboard: bool,
  },
}

/// One call the transport must perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Reply {
  SendMessage {
    chat_id:      i64,
    text:         String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode:   Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup>,
  },
  AnswerCallbackQuery {
    callback_query_id: String,
    text:              String,
    show_alert:        bool,
  },
}

impl Reply {
  pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
    Self::SendMessage {
      chat_id,
      text: text.into(),
      parse_mode: None,
      reply_markup: None,
    }
  }

  pub fn with_markup(chat_id: i64, text: impl Into<String>, markup: ReplyMarkup) -> Self {
    Self::SendMessage {
      chat_id,
      text: text.into(),
      parse_mode: None,
      reply_markup: Some(markup),
    }
  }

  pub fn html(chat_id: i64, text: impl Into<String>) -> Self {
    Self::SendMessage {
      chat_id,
      text: text.into(),
      parse_mode: Some(ParseMode::Html),
      reply_markup: None,
    }
  }

  /// A short toast under the pressed button.
  pub fn toast(callback_query_id: impl Into<String>, text: impl Into<String>) -> Self {
    Self::AnswerCallbackQuery {
      callback_query_id: callback_query_id.into(),
      text:              text.into(),
      show_alert:        false,
    }
  }

  /// A modal alert the user must dismiss.
  pub fn alert(callback_query_id: impl Into<String>, text: impl Into<String>) -> Self {
    Self::AnswerCallbackQuery {
      callback_query_id: callback_query_id.into(),
      text:              text.into(),
      show_alert:        true,
    }
  }

  /// The text of a `SendMessage`, or of a callback answer.
  pub fn body(&self) -> &str {
    match self {
      Self::SendMessage { text, .. } | Self::AnswerCallbackQuery { text, .. } => text,
    }
  }
}

/// Body returned from the webhook endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
  pub replies: Vec<Reply>,
}
