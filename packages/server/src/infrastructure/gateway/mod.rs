//! Gateway implementations.

mod http;

pub use http::HttpRoomGateway;
