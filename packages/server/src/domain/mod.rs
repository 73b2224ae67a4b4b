//! Domain layer: value objects, entities, the error taxonomy and the gateway
//! interface the rest of the application depends on.

pub mod entity;
pub mod error;
pub mod gateway;
pub mod value_object;

pub use entity::{ChatMessage, Room};
pub use error::ChatError;
pub use gateway::RoomGateway;
pub use value_object::{RoomId, Username, ValueObjectError};

#[cfg(test)]
pub use gateway::MockRoomGateway;
