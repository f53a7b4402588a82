//! Core types and trait definitions for the habit tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::HabitStore`]; the chat layer depends
//! only on that abstraction.

pub mod error;
pub mod habit;
pub mod log;
pub mod store;
pub mod user;
pub mod week;

pub use error::{Error, Result};
