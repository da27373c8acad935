use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How long a room may sit idle before the sweep removes it.
pub const STALE_ROOM_MS: i64 = 60 * 60 * 1000;

/// Minimum gap between two staleness sweeps.
pub const SWEEP_INTERVAL_MS: i64 = 60 * 60 * 1000;

/// Current time as epoch milliseconds, the unit used throughout the
/// persisted dataset.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A player inside a room. The id is an opaque string generated by the
/// client; the server never mints player ids itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub is_ready: bool,
}

impl Player {
    /// A freshly joined player starts not-ready.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            is_ready: false,
        }
    }
}

/// Lifecycle phase of a room. Rooms never terminate through a state,
/// they end by being deleted from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Waiting,
    Playing,
}

/// A single game session keyed by a 5-digit numeric id.
///
/// Invariants held by the lifecycle functions:
/// - `owner_id` matches some player's id while the room is non-empty
/// - `Playing` implies `current_word` and `fake_artist_id` are set and the
///   fake artist is a current player
/// - `Waiting` implies both are `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub owner_id: String,
    pub players: Vec<Player>,
    pub current_word: Option<String>,
    pub fake_artist_id: Option<String>,
    pub game_state: GameState,
    pub last_activity: i64,
}

impl Room {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.is_ready)
    }

    /// Refreshes the activity timestamp that feeds the staleness sweep.
    pub fn touch(&mut self, now: i64) {
        self.last_activity = now;
    }
}

/// The complete persisted collection of rooms plus sweep bookkeeping.
/// Serialized wholesale as one pretty-printed JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub rooms: HashMap<String, Room>,
    pub last_cleanup: i64,
}

impl Dataset {
    /// An empty dataset, as created when no backing file exists yet.
    pub fn new(now: i64) -> Self {
        Self {
            rooms: HashMap::new(),
            last_cleanup: now,
        }
    }

    /// Removes rooms idle for longer than [`STALE_ROOM_MS`], gated to run
    /// at most once per [`SWEEP_INTERVAL_MS`]. Returns how many rooms were
    /// dropped, or `None` when the gate skipped the sweep entirely.
    pub fn sweep_stale(&mut self, now: i64) -> Option<usize> {
        if now - self.last_cleanup < SWEEP_INTERVAL_MS {
            return None;
        }

        let before = self.rooms.len();
        self.rooms
            .retain(|_, room| now - room.last_activity < STALE_ROOM_MS);
        self.last_cleanup = now;

        Some(before - self.rooms.len())
    }
}
