use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::models::Room;

/// Body of `POST /api/room/{roomId}`. The action is kept as a plain
/// string so unknown values reach the handler and come back as a 400
/// rather than failing extraction.
#[derive(Debug, Deserialize)]
pub struct RoomActionRequest {
    pub action: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Response for `GET /api/rooms`
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: HashMap<String, Room>,
}

/// Response for `GET /api/room/{roomId}`
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomResponse {
    pub room: Room,
}

/// Response for the create/update/delete actions; `room` is omitted on
/// delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
}
