//! Infrastructure layer: concrete implementations of the domain seams and
//! wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
