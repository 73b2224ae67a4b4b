//! Infrastructure layer: wire DTOs and the HTTP implementation of the gateway.

pub mod dto;
pub mod gateway;
