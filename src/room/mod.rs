// Public API - what other modules can use
pub use handlers::{get_room, list_rooms, room_action};

// Internal modules
mod handlers;
pub mod lifecycle;
pub mod models;
pub mod store;
pub mod types;
pub mod words;
