//! Terminal chat client for the pika hub.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod typing;
mod ui;
mod view;

pub use runner::run_client;
