//! Request handlers.

mod http;
mod websocket;

pub use http::{get_history, get_roster, health_check};
pub use websocket::websocket_handler;
