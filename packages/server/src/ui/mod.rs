//! HTTP front for the room gateway.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
