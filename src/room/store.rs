use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, info, instrument};

use super::models::{now_millis, Dataset, Room};
use crate::shared::AppError;

/// Trait for the durable room mapping plus its staleness sweep
#[async_trait]
pub trait RoomStore {
    /// Loads the full dataset, treating missing backing storage as empty.
    async fn read_dataset(&self) -> Result<Dataset, AppError>;

    /// Serializes the full dataset, overwriting prior content.
    async fn write_dataset(&self, dataset: &Dataset) -> Result<(), AppError>;

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, AppError>;

    /// Insert-or-replace of a single room.
    async fn update_room(&self, room_id: &str, room: &Room) -> Result<(), AppError>;

    /// Removes a room; removing an absent id is not an error.
    async fn delete_room(&self, room_id: &str) -> Result<(), AppError>;

    async fn list_rooms(&self) -> Result<HashMap<String, Room>, AppError>;

    /// Runs the hourly-gated staleness sweep, returning how many rooms
    /// were removed (zero when the gate skipped it).
    async fn sweep_stale(&self) -> Result<usize, AppError>;
}

/// File-backed store holding the entire dataset in one pretty-printed
/// JSON file, rewritten wholesale on every mutation.
///
/// A single async mutex serializes each read-modify-write cycle, so two
/// concurrent mutations cannot silently drop each other's writes.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Dataset, AppError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| AppError::Storage(format!("corrupt dataset file: {}", e))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No backing file, starting empty");
                Ok(Dataset::new(now_millis()))
            }
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }

    async fn persist(&self, dataset: &Dataset) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(dataset)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}

#[async_trait]
impl RoomStore for JsonFileStore {
    #[instrument(skip(self))]
    async fn read_dataset(&self) -> Result<Dataset, AppError> {
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    #[instrument(skip(self, dataset))]
    async fn write_dataset(&self, dataset: &Dataset) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.persist(dataset).await
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, AppError> {
        let _guard = self.write_lock.lock().await;
        let dataset = self.load().await?;
        Ok(dataset.rooms.get(room_id).cloned())
    }

    #[instrument(skip(self, room))]
    async fn update_room(&self, room_id: &str, room: &Room) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut dataset = self.load().await?;
        dataset.rooms.insert(room_id.to_string(), room.clone());
        self.persist(&dataset).await?;

        debug!(room_id = %room_id, "Room stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_room(&self, room_id: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut dataset = self.load().await?;
        dataset.rooms.remove(room_id);
        self.persist(&dataset).await?;

        debug!(room_id = %room_id, "Room deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<HashMap<String, Room>, AppError> {
        let _guard = self.write_lock.lock().await;
        let dataset = self.load().await?;
        Ok(dataset.rooms)
    }

    #[instrument(skip(self))]
    async fn sweep_stale(&self) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut dataset = self.load().await?;

        match dataset.sweep_stale(now_millis()) {
            None => {
                debug!("Sweep gated, skipping");
                Ok(0)
            }
            Some(removed) => {
                self.persist(&dataset).await?;
                if removed > 0 {
                    info!(removed = removed, "Swept stale rooms");
                }
                Ok(removed)
            }
        }
    }
}

/// In-memory implementation of RoomStore for development and testing
pub struct InMemoryRoomStore {
    dataset: Mutex<Dataset>,
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            dataset: Mutex::new(Dataset::new(now_millis())),
        }
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn read_dataset(&self) -> Result<Dataset, AppError> {
        Ok(self.dataset.lock().unwrap().clone())
    }

    async fn write_dataset(&self, dataset: &Dataset) -> Result<(), AppError> {
        *self.dataset.lock().unwrap() = dataset.clone();
        Ok(())
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, AppError> {
        Ok(self.dataset.lock().unwrap().rooms.get(room_id).cloned())
    }

    async fn update_room(&self, room_id: &str, room: &Room) -> Result<(), AppError> {
        self.dataset
            .lock()
            .unwrap()
            .rooms
            .insert(room_id.to_string(), room.clone());
        Ok(())
    }

    async fn delete_room(&self, room_id: &str) -> Result<(), AppError> {
        self.dataset.lock().unwrap().rooms.remove(room_id);
        Ok(())
    }

    async fn list_rooms(&self) -> Result<HashMap<String, Room>, AppError> {
        Ok(self.dataset.lock().unwrap().rooms.clone())
    }

    async fn sweep_stale(&self) -> Result<usize, AppError> {
        let removed = self
            .dataset
            .lock()
            .unwrap()
            .sweep_stale(now_millis())
            .unwrap_or(0);
        Ok(removed)
    }
}
