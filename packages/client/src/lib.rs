//! Terminal chat client library.
//!
//! Joins (or creates) a room through the backend gateway, then keeps one live
//! STOMP-over-WebSocket session per open chat screen.

pub mod error;
pub mod formatter;
pub mod join;
pub mod runner;
pub mod screen;
pub mod session;
pub mod stomp;
pub mod ui;
pub mod view;
