//! Pika chat server: a presence-and-messaging hub over WebSocket.
//!
//! The crate is layered as `domain` / `usecase` / `infrastructure` / `ui`,
//! with `bootstrap` wiring them together.

pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
