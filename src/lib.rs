// Library crate for the fake-artist party game server
// This file exposes the public API for integration tests

pub mod room;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use room::models::{Dataset, GameState, Player, Room};
pub use room::store::{InMemoryRoomStore, JsonFileStore, RoomStore};
pub use shared::{AppError, AppState};
