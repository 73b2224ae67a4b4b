//! UseCase layer: application operations behind the HTTP surface.

mod check_room;
mod get_messages;

pub use check_room::CheckRoomUseCase;
pub use get_messages::GetMessagesUseCase;
