//! Data Transfer Objects (DTOs) for the chat application.
//!
//! DTOs are organized by protocol:
//! - `message`: chat message payload shared by REST history and the broker
//! - `http`: REST request / response bodies

pub mod conversion;
pub mod http;
pub mod message;
