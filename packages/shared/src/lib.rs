//! Utilities shared by the roomchat server and client packages.

pub mod config;
pub mod logger;
pub mod time;
