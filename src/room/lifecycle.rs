//! Pure transition functions over a single [`Room`].
//!
//! Each operation takes the room by value together with a `now` timestamp
//! and returns the next room value; callers are responsible for persisting
//! the result. Operations invoked against unmet preconditions (starting
//! without everyone ready, restarting as a non-owner) return the room
//! unchanged rather than erroring.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::models::{GameState, Player, Room};
use super::words::random_word;

/// Result of a player leaving a room.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveOutcome {
    /// Players remain; persist the updated room.
    Updated(Room),
    /// The last player left; the room must be deleted, never persisted empty.
    Delete,
}

/// Creates a new waiting room with the owner as its only player.
pub fn create_room(id: String, owner_id: String, owner_name: String, now: i64) -> Room {
    debug!(room_id = %id, owner_id = %owner_id, "Creating room");

    Room {
        id,
        owner_id: owner_id.clone(),
        players: vec![Player::new(owner_id, owner_name)],
        current_word: None,
        fake_artist_id: None,
        game_state: GameState::Waiting,
        last_activity: now,
    }
}

/// Adds a player to the room. Joining with an id that is already present
/// returns the room unchanged, so retried joins are harmless.
pub fn join(mut room: Room, player_id: String, player_name: String, now: i64) -> Room {
    if room.has_player(&player_id) {
        debug!(room_id = %room.id, player_id = %player_id, "Player already in room");
        return room;
    }

    room.players.push(Player::new(player_id, player_name));
    room.touch(now);
    room
}

/// Removes a player. An emptied room signals deletion; if the owner left,
/// ownership passes to the first remaining player in stored order.
pub fn leave(mut room: Room, player_id: &str, now: i64) -> LeaveOutcome {
    room.players.retain(|p| p.id != player_id);

    if room.players.is_empty() {
        debug!(room_id = %room.id, "Last player left, room will be deleted");
        return LeaveOutcome::Delete;
    }

    if room.owner_id == player_id {
        room.owner_id = room.players[0].id.clone();
        debug!(
            room_id = %room.id,
            new_owner_id = %room.owner_id,
            "Owner left, reassigned ownership"
        );
    }

    room.touch(now);
    LeaveOutcome::Updated(room)
}

/// Flips the ready flag of the matching player; unknown ids leave the
/// player list untouched.
pub fn toggle_ready(mut room: Room, player_id: &str, now: i64) -> Room {
    for player in &mut room.players {
        if player.id == player_id {
            player.is_ready = !player.is_ready;
        }
    }

    room.touch(now);
    room
}

/// Starts a round: picks a secret word and a fake artist, both uniformly
/// at random and independently of each other. Requires at least two
/// players with everyone ready, otherwise the room is returned unchanged.
pub fn start<R: Rng + ?Sized>(mut room: Room, rng: &mut R, now: i64) -> Room {
    if room.player_count() < 2 || !room.all_ready() {
        debug!(
            room_id = %room.id,
            player_count = room.player_count(),
            "Start preconditions not met"
        );
        return room;
    }

    let fake_artist = room
        .players
        .choose(rng)
        .map(|p| p.id.clone())
        .unwrap_or_else(|| room.owner_id.clone());

    room.current_word = Some(random_word(rng));
    room.fake_artist_id = Some(fake_artist);
    room.game_state = GameState::Playing;
    room.touch(now);
    room
}

/// Returns the room to the waiting state with everyone un-readied. Only
/// the owner may restart; anyone else gets the room back unchanged.
pub fn restart(mut room: Room, requester_id: &str, now: i64) -> Room {
    if room.owner_id != requester_id {
        debug!(
            room_id = %room.id,
            requester_id = %requester_id,
            "Restart requested by non-owner"
        );
        return room;
    }

    room.current_word = None;
    room.fake_artist_id = None;
    room.game_state = GameState::Waiting;
    for player in &mut room.players {
        player.is_ready = false;
    }

    room.touch(now);
    room
}
