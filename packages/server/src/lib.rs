//! Room gateway library for the roomchat application.
//!
//! This library provides the domain model shared by the server and client
//! packages, an HTTP client for the external chat backend, and the small HTTP
//! surface (`/api/check-room`, `/api/get-messages`) fronting it.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
