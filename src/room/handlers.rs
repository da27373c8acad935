use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::models::{now_millis, Room};
use super::types::{ActionResponse, RoomActionRequest, RoomListResponse, RoomResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing all rooms
///
/// GET /api/rooms
/// Runs the staleness sweep, then returns the full room mapping
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<RoomListResponse>, AppError> {
    state.room_store.sweep_stale().await?;
    let rooms = state.room_store.list_rooms().await?;

    info!(room_count = rooms.len(), "Rooms listed");

    Ok(Json(RoomListResponse { rooms }))
}

/// HTTP handler for fetching a single room
///
/// GET /api/room/:room_id
/// Returns the room or a 404 with `{ "error": "Room not found" }`
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state
        .room_store
        .get_room(&room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    Ok(Json(RoomResponse { room }))
}

/// HTTP handler for room mutations
///
/// POST /api/room/:room_id with `{ "action": "create"|"update"|"delete", "data"? }`
#[instrument(name = "room_action", skip_all, fields(room_id = %room_id, action = %request.action))]
pub async fn room_action(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<RoomActionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    match request.action.as_str() {
        "create" => {
            let data = request
                .data
                .ok_or_else(|| AppError::InvalidRequest("Missing room data".to_string()))?;
            let room: Room = serde_json::from_value(data)
                .map_err(|e| AppError::InvalidRequest(format!("Malformed room: {}", e)))?;

            state.room_store.update_room(&room_id, &room).await?;
            info!(player_count = room.player_count(), "Room created");

            Ok(Json(ActionResponse {
                success: true,
                room: Some(room),
            }))
        }

        "update" => {
            let room = state
                .room_store
                .get_room(&room_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

            let data = request.data.unwrap_or(Value::Object(Default::default()));
            let updated = merge_room(&room, data, now_millis())?;

            state.room_store.update_room(&room_id, &updated).await?;
            info!("Room updated");

            Ok(Json(ActionResponse {
                success: true,
                room: Some(updated),
            }))
        }

        "delete" => {
            state.room_store.delete_room(&room_id).await?;
            info!("Room deleted");

            Ok(Json(ActionResponse {
                success: true,
                room: None,
            }))
        }

        other => {
            warn!(action = %other, "Rejecting unknown room action");
            Err(AppError::InvalidRequest("Invalid action".to_string()))
        }
    }
}

/// Merges a partial room object over the stored room, field-wise at the
/// top level, and refreshes the activity timestamp.
fn merge_room(room: &Room, data: Value, now: i64) -> Result<Room, AppError> {
    let Value::Object(patch) = data else {
        return Err(AppError::InvalidRequest(
            "Room patch must be an object".to_string(),
        ));
    };

    let mut value = serde_json::to_value(room).map_err(|e| AppError::Storage(e.to_string()))?;
    let base = value
        .as_object_mut()
        .expect("a room always serializes to a JSON object");

    for (key, field) in patch {
        base.insert(key, field);
    }
    base.insert("lastActivity".to_string(), Value::from(now));

    serde_json::from_value(value)
        .map_err(|e| AppError::InvalidRequest(format!("Malformed room patch: {}", e)))
}
