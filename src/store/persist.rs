//! Persistence keys and load/save helpers for the store.
//!
//! Each collection lives under its own key, JSON-encoded, with a
//! `user_<id>_` prefix when a user is signed in so one user's data never
//! collides with another's on shared storage.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::storage::{Storage, StorageError};
use crate::model::{Folder, Note, Tag};

pub const NOTES_KEY: &str = "noteflow_notes";
pub const FOLDERS_KEY: &str = "noteflow_folders";
pub const TAGS_KEY: &str = "noteflow_tags";
pub const ACTIVE_NOTE_KEY: &str = "noteflow_active_note";
pub const ACTIVE_FOLDER_KEY: &str = "noteflow_active_folder";
pub const DEFAULT_BG_KEY: &str = "noteflow_default_bg";

/// Storage prefix for a user id: `user_<id>_`, or empty when signed out.
pub fn user_prefix(user_id: Option<&str>) -> String {
    match user_id {
        Some(id) => format!("user_{}_", id),
        None => String::new(),
    }
}

/// Read and decode one key. Missing key decodes to `None`; malformed
/// JSON is surfaced, not papered over.
pub fn load_value<T: DeserializeOwned>(
    storage: &dyn Storage,
    prefix: &str,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let full = format!("{}{}", prefix, key);
    let Some(raw) = storage.get(&full)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(|e| StorageError::Malformed {
        key: full,
        source: e,
    })
}

/// Encode and write one key.
pub fn save_value<T: Serialize + ?Sized>(
    storage: &mut dyn Storage,
    prefix: &str,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let full = format!("{}{}", prefix, key);
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: full.clone(),
        source: e,
    })?;
    storage.set(&full, &raw)
}

/// Everything the store persists, bundled for load.
#[derive(Debug, Default)]
pub struct PersistedState {
    pub notes: Option<Vec<Note>>,
    pub folders: Option<Vec<Folder>>,
    pub tags: Option<Vec<Tag>>,
    pub active_note_id: Option<Option<String>>,
    pub active_folder_id: Option<Option<String>>,
    pub default_background: Option<String>,
}

/// Load all persisted collections for the given prefix.
pub fn load_state(storage: &dyn Storage, prefix: &str) -> Result<PersistedState, StorageError> {
    Ok(PersistedState {
        notes: load_value(storage, prefix, NOTES_KEY)?,
        folders: load_value(storage, prefix, FOLDERS_KEY)?,
        tags: load_value(storage, prefix, TAGS_KEY)?,
        active_note_id: load_value(storage, prefix, ACTIVE_NOTE_KEY)?,
        active_folder_id: load_value(storage, prefix, ACTIVE_FOLDER_KEY)?,
        default_background: load_value(storage, prefix, DEFAULT_BG_KEY)?,
    })
}
