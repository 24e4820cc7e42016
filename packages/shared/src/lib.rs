//! Utilities shared by the pika server and client.

pub mod logger;
pub mod time;
