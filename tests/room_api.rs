//! End-to-end tests driving the HTTP surface the way the polling client
//! does: every lifecycle step is computed locally with the lifecycle
//! functions and pushed through the generic create/update/delete actions.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use fakeartist::room::lifecycle::{self, LeaveOutcome};
use fakeartist::room::models::{
    now_millis, Dataset, GameState, Room, STALE_ROOM_MS, SWEEP_INTERVAL_MS,
};
use fakeartist::room::types::{ActionResponse, RoomListResponse, RoomResponse};
use fakeartist::room::words::WORD_LIST;
use fakeartist::room::{get_room, list_rooms, room_action};
use fakeartist::{AppState, InMemoryRoomStore, JsonFileStore, RoomStore};

fn app(store: Arc<dyn RoomStore + Send + Sync>) -> Router {
    Router::new()
        .route("/api/rooms", get(list_rooms))
        .route("/api/room/:room_id", get(get_room).post(room_action))
        .with_state(AppState::new(store))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn action_request(room_id: &str, action: &str, data: Option<Value>) -> Request<Body> {
    let mut body = json!({ "action": action });
    if let Some(data) = data {
        body["data"] = data;
    }
    Request::builder()
        .method("POST")
        .uri(format!("/api/room/{}", room_id))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Pushes a locally computed room state through the update action,
/// mirroring how the polling client persists each transition.
async fn push_update(app: &Router, room: &Room) -> Room {
    let (status, body) = send(
        app,
        action_request(
            &room.id,
            "update",
            Some(serde_json::to_value(room).unwrap()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: ActionResponse = serde_json::from_value(body).unwrap();
    assert!(response.success);
    response.room.expect("update echoes the room")
}

async fn fetch_room(app: &Router, room_id: &str) -> Room {
    let (status, body) = send(app, get_request(&format!("/api/room/{}", room_id))).await;
    assert_eq!(status, StatusCode::OK);
    let response: RoomResponse = serde_json::from_value(body).unwrap();
    response.room
}

#[tokio::test]
async fn test_create_join_ready_start_restart_flow() {
    let store = Arc::new(InMemoryRoomStore::new());
    let app = app(store);

    // Alice creates the room client-side and pushes it verbatim
    let room = lifecycle::create_room(
        "11111".to_string(),
        "alice-id".to_string(),
        "Alice".to_string(),
        now_millis(),
    );
    let (status, body) = send(
        &app,
        action_request("11111", "create", Some(serde_json::to_value(&room).unwrap())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"]["ownerId"], "alice-id");

    // Bob polls the room, then joins
    let room = fetch_room(&app, "11111").await;
    let room = lifecycle::join(room, "bob-id".to_string(), "Bob".to_string(), now_millis());
    let room = push_update(&app, &room).await;
    assert_eq!(room.player_count(), 2);

    // Joining again changes nothing
    let rejoined = lifecycle::join(
        fetch_room(&app, "11111").await,
        "bob-id".to_string(),
        "Bob".to_string(),
        now_millis(),
    );
    assert_eq!(rejoined.players, room.players);

    // Both ready up
    let room = lifecycle::toggle_ready(room, "alice-id", now_millis());
    let room = lifecycle::toggle_ready(room, "bob-id", now_millis());
    let room = push_update(&app, &room).await;
    assert!(room.all_ready());

    // Owner starts the round
    let room = lifecycle::start(room, &mut rand::rng(), now_millis());
    let room = push_update(&app, &room).await;

    let synced = fetch_room(&app, "11111").await;
    assert_eq!(synced.game_state, GameState::Playing);
    let word = synced.current_word.as_deref().expect("word is set");
    assert!(WORD_LIST.contains(&word));
    let artist = synced.fake_artist_id.as_deref().expect("fake artist is set");
    assert!(synced.has_player(artist));

    // Owner restarts back to the lobby
    let room = lifecycle::restart(room, "alice-id", now_millis());
    push_update(&app, &room).await;

    let synced = fetch_room(&app, "11111").await;
    assert_eq!(synced.game_state, GameState::Waiting);
    assert_eq!(synced.current_word, None);
    assert_eq!(synced.fake_artist_id, None);
    assert!(synced.players.iter().all(|p| !p.is_ready));
}

#[tokio::test]
async fn test_owner_departure_reassigns_then_empty_room_is_deleted() {
    let store = Arc::new(InMemoryRoomStore::new());
    let app = app(store);

    let room = lifecycle::create_room(
        "22222".to_string(),
        "alice-id".to_string(),
        "Alice".to_string(),
        now_millis(),
    );
    send(
        &app,
        action_request("22222", "create", Some(serde_json::to_value(&room).unwrap())),
    )
    .await;

    let room = lifecycle::join(room, "bob-id".to_string(), "Bob".to_string(), now_millis());
    let room = push_update(&app, &room).await;

    // Owner leaves; Bob inherits the room
    let room = match lifecycle::leave(room, "alice-id", now_millis()) {
        LeaveOutcome::Updated(room) => push_update(&app, &room).await,
        LeaveOutcome::Delete => panic!("Bob is still in the room"),
    };
    assert_eq!(room.owner_id, "bob-id");

    // Last player leaves; the client deletes instead of persisting empty
    match lifecycle::leave(room, "bob-id", now_millis()) {
        LeaveOutcome::Updated(_) => panic!("room should be empty"),
        LeaveOutcome::Delete => {
            let (status, body) = send(&app, action_request("22222", "delete", None)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "success": true }));
        }
    }

    let (status, body) = send(&app, get_request("/api/room/22222")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Room not found");
}

#[tokio::test]
async fn test_listing_sweeps_two_hour_old_rooms_once_per_hour() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("game-state.json")));
    let now = now_millis();

    let mut stale = lifecycle::create_room(
        "33333".to_string(),
        "p1".to_string(),
        "Alice".to_string(),
        now,
    );
    stale.last_activity = now - 2 * STALE_ROOM_MS;

    let mut dataset = Dataset::new(now - 2 * SWEEP_INTERVAL_MS);
    dataset.rooms.insert("33333".to_string(), stale.clone());
    store.write_dataset(&dataset).await.unwrap();

    let app = app(store.clone());

    let (status, body) = send(&app, get_request("/api/rooms")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: RoomListResponse = serde_json::from_value(body).unwrap();
    assert!(listed.rooms.is_empty(), "stale room should be swept");

    // The sweep just ran, so a newly re-seeded stale room survives the
    // next listing regardless of its age.
    store.update_room("33333", &stale).await.unwrap();
    let (_, body) = send(&app, get_request("/api/rooms")).await;
    let listed: RoomListResponse = serde_json::from_value(body).unwrap();
    assert!(listed.rooms.contains_key("33333"));
}

#[tokio::test]
async fn test_concurrent_room_creations_all_survive() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("game-state.json")));
    let app = app(store);
    let now = now_millis();

    let handles = (0..6)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let id = format!("{}", 10_000 + i);
                let room = lifecycle::create_room(
                    id.clone(),
                    format!("player-{}", i),
                    format!("Player {}", i),
                    now,
                );
                let (status, _) = send(
                    &app,
                    action_request(&id, "create", Some(serde_json::to_value(&room).unwrap())),
                )
                .await;
                status
            })
        })
        .collect::<Vec<_>>();

    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap(), StatusCode::OK);
    }

    let (_, body) = send(&app, get_request("/api/rooms")).await;
    let listed: RoomListResponse = serde_json::from_value(body).unwrap();
    assert_eq!(listed.rooms.len(), 6);
}
