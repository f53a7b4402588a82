//! Chat layer for the habit tracker.
//!
//! Exposes a [`Dispatcher`] that routes chat updates to handlers backed by
//! any [`HabitStore`], and an axum [`Router`] that accepts those updates over
//! a webhook and returns the replies the transport should send.

pub mod auth;
pub mod clock;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod session;
pub mod update;
pub mod view;

pub use dispatch::Dispatcher;
pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use habit_core::store::HabitStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::Authenticated;
use update::{Update, WebhookResponse};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `HABIT_*`
/// environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct BotConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Expected value of the webhook secret header; `None` disables the check.
  pub webhook_secret: Option<String>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: HabitStore> {
  pub dispatcher: Arc<Dispatcher<S>>,
  pub config:     Arc<BotConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the webhook [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: HabitStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/updates", post(updates_handler::<S>))
    .route("/health",  get(health_handler))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn updates_handler<S>(
  _auth:        Authenticated,
  State(state): State<AppState<S>>,
  Json(update): Json<Update>,
) -> Json<WebhookResponse>
where
  S: HabitStore + Clone + Send + Sync + 'static,
{
  tracing::debug!(update_id = update.update_id, "received update");
  let replies = state.dispatcher.dispatch(update).await;
  Json(WebhookResponse { replies })
}

async fn health_handler() -> &'static str { "ok" }
