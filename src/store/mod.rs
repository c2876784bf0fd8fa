//! The note store: single source of truth for notes, folders, tags,
//! selection state and edit history.
//!
//! All mutation goes through the store's operations. Operations on ids
//! that don't exist are silent no-ops; the only error channel is the
//! storage backend, which every mutation writes through before
//! returning.

pub mod history;
pub mod persist;
pub mod sample;

use chrono::Utc;
use uuid::Uuid;

use crate::io::storage::{Storage, StorageError};
use crate::model::{Folder, FolderUpdate, NewFolder, Note, NoteUpdate, NoteVersion, Tag};
use self::history::NoteHistory;
use self::persist::{
    ACTIVE_FOLDER_KEY, ACTIVE_NOTE_KEY, DEFAULT_BG_KEY, FOLDERS_KEY, NOTES_KEY, TAGS_KEY,
};

/// Background color notes take when none has been chosen.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

pub struct NoteStore<S: Storage> {
    storage: S,
    prefix: String,
    history: NoteHistory,
    folders: Vec<Folder>,
    tags: Vec<Tag>,
    active_note_id: Option<String>,
    active_folder_id: Option<String>,
    default_background: String,
    /// Multi-select set, insertion order. Not persisted and independent
    /// of the history stack.
    selected_note_ids: Vec<String>,
}

impl<S: Storage> NoteStore<S> {
    /// Open the store for the given user (None = signed out), loading
    /// persisted collections or seeding the sample data on first run.
    pub fn open(storage: S, user_id: Option<&str>) -> Result<Self, StorageError> {
        let prefix = persist::user_prefix(user_id);
        let state = persist::load_state(&storage, &prefix)?;

        let notes = state.notes.unwrap_or_else(sample::sample_notes);
        let folders = state.folders.unwrap_or_else(sample::sample_folders);
        let tags = state.tags.unwrap_or_else(sample::sample_tags);

        Ok(NoteStore {
            storage,
            prefix,
            history: NoteHistory::new(notes),
            folders,
            tags,
            active_note_id: state.active_note_id.flatten(),
            active_folder_id: state.active_folder_id.flatten(),
            default_background: state
                .default_background
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            selected_note_ids: Vec::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn notes(&self) -> &[Note] {
        self.history.present()
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes().iter().find(|n| n.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// Find a tag by name (exact match).
    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn active_note_id(&self) -> Option<&str> {
        self.active_note_id.as_deref()
    }

    pub fn active_folder_id(&self) -> Option<&str> {
        self.active_folder_id.as_deref()
    }

    pub fn default_background(&self) -> &str {
        &self.default_background
    }

    pub fn selected_note_ids(&self) -> &[String] {
        &self.selected_note_ids
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Note operations
    // -----------------------------------------------------------------------

    /// Create a note in the active folder. See [`Self::create_note_in`].
    pub fn create_note(&mut self) -> Result<String, StorageError> {
        self.create_note_in(self.active_folder_id.clone())
    }

    /// Create an empty untitled note, prepend it to the collection (new
    /// notes sort first), make it the active note and return its id.
    pub fn create_note_in(&mut self, folder_id: Option<String>) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        let note = Note::new(
            id.clone(),
            folder_id,
            Some(self.default_background.clone()),
        );

        let mut next = self.notes().to_vec();
        next.insert(0, note);
        self.history.commit(next);

        self.active_note_id = Some(id.clone());
        self.save_notes()?;
        self.save_active_note()?;
        Ok(id)
    }

    /// Apply a partial update to the note matching `id`.
    ///
    /// A content change first archives the outgoing `(content,
    /// updatedAt, version)` triple and bumps `version`; any other update
    /// leaves the version chain alone. `updatedAt` refreshes on every
    /// hit. A miss still commits a history snapshot, matching an
    /// "update affects zero rows" write.
    pub fn update_note(&mut self, id: &str, update: NoteUpdate) -> Result<(), StorageError> {
        let mut next = self.notes().to_vec();
        if let Some(note) = next.iter_mut().find(|n| n.id == id) {
            if let Some(content) = &update.content
                && *content != note.content
            {
                note.previous_versions.push(NoteVersion {
                    content: std::mem::take(&mut note.content),
                    updated_at: note.updated_at,
                    version: note.version,
                });
                note.version += 1;
            }
            if let Some(title) = update.title {
                note.title = title;
            }
            if let Some(content) = update.content {
                note.content = content;
            }
            if let Some(folder_id) = update.folder_id {
                note.folder_id = folder_id;
            }
            if let Some(pinned) = update.is_pinned {
                note.is_pinned = pinned;
            }
            if let Some(background) = update.background_color {
                note.background_color = background;
            }
            if let Some(protected) = update.is_password_protected {
                note.is_password_protected = protected;
            }
            if let Some(password) = update.password {
                note.password = password;
            }
            if let Some(public) = update.is_public {
                note.is_public = public;
            }
            if let Some(link) = update.public_link {
                note.public_link = link;
            }
            if let Some(attachments) = update.attachments {
                note.attachments = attachments;
            }
            note.updated_at = Utc::now();
        }
        self.history.commit(next);
        self.save_notes()
    }

    pub fn delete_note(&mut self, id: &str) -> Result<(), StorageError> {
        self.delete_notes(std::slice::from_ref(&id.to_string()))
    }

    /// Remove all notes whose ids appear in `ids`. Clears the active
    /// note if it was among them and scrubs them from the selection.
    pub fn delete_notes(&mut self, ids: &[String]) -> Result<(), StorageError> {
        let next: Vec<Note> = self
            .notes()
            .iter()
            .filter(|n| !ids.contains(&n.id))
            .cloned()
            .collect();
        self.history.commit(next);

        if let Some(active) = &self.active_note_id
            && ids.contains(active)
        {
            self.active_note_id = None;
        }
        self.selected_note_ids.retain(|id| !ids.contains(id));

        self.save_notes()?;
        self.save_active_note()
    }

    /// Delete every note in the selection set, then clear it.
    /// Returns how many notes were requested for deletion.
    pub fn delete_selected_notes(&mut self) -> Result<usize, StorageError> {
        let ids = std::mem::take(&mut self.selected_note_ids);
        self.delete_notes(&ids)?;
        Ok(ids.len())
    }

    /// Flip a note's pin. Not a content change: no version bump.
    pub fn toggle_pinned(&mut self, id: &str) -> Result<(), StorageError> {
        let Some(pos) = self.notes().iter().position(|n| n.id == id) else {
            return Ok(());
        };
        let mut next = self.notes().to_vec();
        let note = &mut next[pos];
        note.is_pinned = !note.is_pinned;
        note.updated_at = Utc::now();
        self.history.commit(next);
        self.save_notes()
    }

    // -----------------------------------------------------------------------
    // Folder operations
    // -----------------------------------------------------------------------

    /// Create a folder, prepending it to the collection. Returns its id.
    pub fn create_folder(&mut self, new: NewFolder) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        self.folders.insert(
            0,
            Folder {
                id: id.clone(),
                name: new.name,
                created_at: Utc::now(),
                color: new.color,
                icon: new.icon,
                parent_id: new.parent_id,
            },
        );
        self.save_folders()?;
        Ok(id)
    }

    /// Merge fields into the folder matching `id`. Silent no-op on miss.
    pub fn update_folder(&mut self, id: &str, update: FolderUpdate) -> Result<(), StorageError> {
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
            if let Some(name) = update.name {
                folder.name = name;
            }
            if let Some(color) = update.color {
                folder.color = color;
            }
            if let Some(icon) = update.icon {
                folder.icon = icon;
            }
            if let Some(parent_id) = update.parent_id {
                folder.parent_id = parent_id;
            }
            self.save_folders()?;
        }
        Ok(())
    }

    /// Delete a folder. Its notes move to root; its direct child
    /// folders are re-parented to the deleted folder's own parent. The
    /// active folder selection is cleared if it pointed here.
    pub fn delete_folder(&mut self, id: &str) -> Result<(), StorageError> {
        let Some(pos) = self.folders.iter().position(|f| f.id == id) else {
            return Ok(());
        };
        let removed = self.folders.remove(pos);

        for folder in &mut self.folders {
            if folder.parent_id.as_deref() == Some(id) {
                folder.parent_id = removed.parent_id.clone();
            }
        }

        let mut next = self.notes().to_vec();
        for note in &mut next {
            if note.folder_id.as_deref() == Some(id) {
                note.folder_id = None;
            }
        }
        self.history.commit(next);

        if self.active_folder_id.as_deref() == Some(id) {
            self.active_folder_id = None;
        }

        self.save_folders()?;
        self.save_notes()?;
        self.save_active_folder()
    }

    // -----------------------------------------------------------------------
    // Tag operations
    // -----------------------------------------------------------------------

    /// Create a tag, prepending it to the collection. Returns its id.
    pub fn create_tag(&mut self, name: &str, color: &str) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        self.tags.insert(
            0,
            Tag {
                id: id.clone(),
                name: name.to_string(),
                color: color.to_string(),
            },
        );
        self.save_tags()?;
        Ok(id)
    }

    /// Delete a tag and scrub its id from every note's tag set. Both
    /// effects land in the same commit: no note is ever observable with
    /// a dangling tag id.
    pub fn delete_tag(&mut self, id: &str) -> Result<(), StorageError> {
        let Some(pos) = self.tags.iter().position(|t| t.id == id) else {
            return Ok(());
        };
        self.tags.remove(pos);

        let mut next = self.notes().to_vec();
        for note in &mut next {
            note.tags.retain(|tag_id| tag_id != id);
        }
        self.history.commit(next);

        self.save_tags()?;
        self.save_notes()
    }

    /// Add a tag to a note. Adding an already-present tag is a no-op.
    pub fn add_tag_to_note(&mut self, note_id: &str, tag_id: &str) -> Result<(), StorageError> {
        let Some(pos) = self.notes().iter().position(|n| n.id == note_id) else {
            return Ok(());
        };
        if self.notes()[pos].tags.iter().any(|t| t == tag_id) {
            return Ok(());
        }
        let mut next = self.notes().to_vec();
        next[pos].tags.push(tag_id.to_string());
        next[pos].updated_at = Utc::now();
        self.history.commit(next);
        self.save_notes()
    }

    /// Remove a tag from a note. Removing an absent tag is a no-op.
    pub fn remove_tag_from_note(
        &mut self,
        note_id: &str,
        tag_id: &str,
    ) -> Result<(), StorageError> {
        let Some(pos) = self.notes().iter().position(|n| n.id == note_id) else {
            return Ok(());
        };
        if !self.notes()[pos].tags.iter().any(|t| t == tag_id) {
            return Ok(());
        }
        let mut next = self.notes().to_vec();
        next[pos].tags.retain(|t| t != tag_id);
        next[pos].updated_at = Utc::now();
        self.history.commit(next);
        self.save_notes()
    }

    // -----------------------------------------------------------------------
    // Sharing & versions
    // -----------------------------------------------------------------------

    /// Enable password protection (`Some(password)`) or remove it
    /// (`None`). Returns whether the note exists.
    pub fn protect_note(
        &mut self,
        id: &str,
        password: Option<String>,
    ) -> Result<bool, StorageError> {
        if self.note(id).is_none() {
            return Ok(false);
        }
        self.update_note(
            id,
            NoteUpdate {
                is_password_protected: Some(password.is_some()),
                password: Some(password),
                ..Default::default()
            },
        )?;
        Ok(true)
    }

    /// Toggle public sharing. When enabling, constructs and stores the
    /// public link `<base_url>/share/<id>` and returns it; when
    /// disabling, clears the link. Returns `None` when the note doesn't
    /// exist or sharing was turned off.
    pub fn share_note(
        &mut self,
        id: &str,
        public: bool,
        base_url: &str,
    ) -> Result<Option<String>, StorageError> {
        if self.note(id).is_none() {
            return Ok(None);
        }
        let link = public.then(|| format!("{}/share/{}", base_url.trim_end_matches('/'), id));
        self.update_note(
            id,
            NoteUpdate {
                is_public: Some(public),
                public_link: Some(link.clone()),
                ..Default::default()
            },
        )?;
        Ok(link)
    }

    /// Re-apply an archived version's content. The restore goes through
    /// `update_note`, so it appends a fresh version entry of its own.
    /// Returns false when the note or version doesn't exist.
    pub fn restore_version(&mut self, id: &str, version: u32) -> Result<bool, StorageError> {
        let Some(content) = self
            .note(id)
            .and_then(|n| n.previous_version(version))
            .map(|v| v.content.clone())
        else {
            return Ok(false);
        };
        self.update_note(id, NoteUpdate::content(content))?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Step the notes collection back one snapshot. No-op when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Result<bool, StorageError> {
        if !self.history.undo() {
            return Ok(false);
        }
        self.save_notes()?;
        Ok(true)
    }

    /// Step the notes collection forward one snapshot. No-op when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, StorageError> {
        if !self.history.redo() {
            return Ok(false);
        }
        self.save_notes()?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Selection & active state
    // -----------------------------------------------------------------------

    /// Toggle a note in or out of the multi-select set.
    pub fn toggle_note_selection(&mut self, id: &str) {
        if let Some(pos) = self.selected_note_ids.iter().position(|s| s == id) {
            self.selected_note_ids.remove(pos);
        } else {
            self.selected_note_ids.push(id.to_string());
        }
    }

    pub fn clear_note_selection(&mut self) {
        self.selected_note_ids.clear();
    }

    pub fn set_active_note(&mut self, id: Option<String>) -> Result<(), StorageError> {
        self.active_note_id = id;
        self.save_active_note()
    }

    pub fn set_active_folder(&mut self, id: Option<String>) -> Result<(), StorageError> {
        self.active_folder_id = id;
        self.save_active_folder()
    }

    pub fn set_default_background(&mut self, color: &str) -> Result<(), StorageError> {
        self.default_background = color.to_string();
        persist::save_value(
            &mut self.storage,
            &self.prefix,
            DEFAULT_BG_KEY,
            &self.default_background,
        )
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn save_notes(&mut self) -> Result<(), StorageError> {
        persist::save_value(
            &mut self.storage,
            &self.prefix,
            NOTES_KEY,
            self.history.present(),
        )
    }

    fn save_folders(&mut self) -> Result<(), StorageError> {
        persist::save_value(&mut self.storage, &self.prefix, FOLDERS_KEY, &self.folders)
    }

    fn save_tags(&mut self) -> Result<(), StorageError> {
        persist::save_value(&mut self.storage, &self.prefix, TAGS_KEY, &self.tags)
    }

    fn save_active_note(&mut self) -> Result<(), StorageError> {
        persist::save_value(
            &mut self.storage,
            &self.prefix,
            ACTIVE_NOTE_KEY,
            &self.active_note_id,
        )
    }

    fn save_active_folder(&mut self) -> Result<(), StorageError> {
        persist::save_value(
            &mut self.storage,
            &self.prefix,
            ACTIVE_FOLDER_KEY,
            &self.active_folder_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use crate::model::UNTITLED;
    use pretty_assertions::assert_eq;

    fn empty_store() -> NoteStore<MemoryStorage> {
        // Seed empty collections so tests start from a clean slate
        // instead of the sample data.
        let mut storage = MemoryStorage::new();
        storage.set(NOTES_KEY, "[]").unwrap();
        storage.set(FOLDERS_KEY, "[]").unwrap();
        storage.set(TAGS_KEY, "[]").unwrap();
        NoteStore::open(storage, None).unwrap()
    }

    #[test]
    fn first_open_seeds_sample_data() {
        let store = NoteStore::open(MemoryStorage::new(), None).unwrap();
        assert!(!store.notes().is_empty());
        assert!(!store.folders().is_empty());
        assert!(!store.tags().is_empty());
    }

    #[test]
    fn create_note_defaults() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        let note = store.note(&id).unwrap();
        assert_eq!(note.title, UNTITLED);
        assert_eq!(note.content, "");
        assert_eq!(note.version, 1);
        assert!(note.previous_versions.is_empty());
        assert!(!note.is_pinned);
        assert_eq!(store.active_note_id(), Some(id.as_str()));
    }

    #[test]
    fn create_note_lands_in_active_folder() {
        let mut store = empty_store();
        let folder = store
            .create_folder(NewFolder {
                name: "Work".into(),
                ..Default::default()
            })
            .unwrap();
        store.set_active_folder(Some(folder.clone())).unwrap();
        let id = store.create_note().unwrap();
        assert_eq!(store.note(&id).unwrap().folder_id.as_deref(), Some(folder.as_str()));

        // Explicit root overrides the active folder
        let root_note = store.create_note_in(None).unwrap();
        assert!(store.note(&root_note).unwrap().folder_id.is_none());
    }

    #[test]
    fn new_notes_sort_first() {
        let mut store = empty_store();
        let first = store.create_note().unwrap();
        let second = store.create_note().unwrap();
        assert_eq!(store.notes()[0].id, second);
        assert_eq!(store.notes()[1].id, first);
    }

    #[test]
    fn content_update_archives_previous_version() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();

        store.update_note(&id, NoteUpdate::content("hello")).unwrap();
        let note = store.note(&id).unwrap();
        assert_eq!(note.version, 2);
        assert_eq!(note.previous_versions.len(), 1);
        assert_eq!(note.previous_versions[0].content, "");
        assert_eq!(note.previous_versions[0].version, 1);

        // Title-only update leaves the version chain alone
        store.update_note(&id, NoteUpdate::title("Hi")).unwrap();
        let note = store.note(&id).unwrap();
        assert_eq!(note.title, "Hi");
        assert_eq!(note.version, 2);
        assert_eq!(note.previous_versions.len(), 1);
    }

    #[test]
    fn identical_content_does_not_bump_version() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        store.update_note(&id, NoteUpdate::content("same")).unwrap();
        store.update_note(&id, NoteUpdate::content("same")).unwrap();
        let note = store.note(&id).unwrap();
        assert_eq!(note.version, 2);
        assert_eq!(note.previous_versions.len(), 1);
    }

    #[test]
    fn update_missing_note_is_silent_but_commits() {
        let mut store = empty_store();
        let depth_before = store.history.depth();
        store
            .update_note("no-such-id", NoteUpdate::title("x"))
            .unwrap();
        assert!(store.notes().is_empty());
        assert_eq!(store.history.depth(), depth_before + 1);
    }

    #[test]
    fn create_then_delete_restores_length_and_clears_active() {
        let mut store = empty_store();
        let before = store.notes().len();
        let id = store.create_note().unwrap();
        store.delete_note(&id).unwrap();
        assert_eq!(store.notes().len(), before);
        assert!(store.active_note_id().is_none());
    }

    #[test]
    fn delete_scrubs_selection() {
        let mut store = empty_store();
        let a = store.create_note().unwrap();
        let b = store.create_note().unwrap();
        store.toggle_note_selection(&a);
        store.toggle_note_selection(&b);
        store.delete_note(&a).unwrap();
        assert_eq!(store.selected_note_ids(), &[b.clone()]);
    }

    #[test]
    fn delete_selected_notes_empties_selection() {
        let mut store = empty_store();
        let a = store.create_note().unwrap();
        let b = store.create_note().unwrap();
        store.toggle_note_selection(&a);
        store.toggle_note_selection(&b);
        let deleted = store.delete_selected_notes().unwrap();
        assert_eq!(deleted, 2);
        assert!(store.notes().is_empty());
        assert!(store.selected_note_ids().is_empty());
    }

    #[test]
    fn toggle_selection_round_trip() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        store.toggle_note_selection(&id);
        assert_eq!(store.selected_note_ids().len(), 1);
        store.toggle_note_selection(&id);
        assert!(store.selected_note_ids().is_empty());
    }

    #[test]
    fn toggle_pinned_flips_without_version_bump() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        store.toggle_pinned(&id).unwrap();
        let note = store.note(&id).unwrap();
        assert!(note.is_pinned);
        assert_eq!(note.version, 1);
        assert!(note.previous_versions.is_empty());
        store.toggle_pinned(&id).unwrap();
        assert!(!store.note(&id).unwrap().is_pinned);
    }

    #[test]
    fn delete_folder_moves_notes_to_root() {
        let mut store = empty_store();
        let folder = store
            .create_folder(NewFolder {
                name: "Work".into(),
                ..Default::default()
            })
            .unwrap();
        let note = store.create_note_in(Some(folder.clone())).unwrap();
        store.delete_folder(&folder).unwrap();
        assert!(store.folder(&folder).is_none());
        assert!(store.note(&note).unwrap().folder_id.is_none());
    }

    #[test]
    fn delete_folder_reparents_children() {
        let mut store = empty_store();
        let top = store
            .create_folder(NewFolder {
                name: "Top".into(),
                ..Default::default()
            })
            .unwrap();
        let middle = store
            .create_folder(NewFolder {
                name: "Middle".into(),
                parent_id: Some(top.clone()),
                ..Default::default()
            })
            .unwrap();
        let leaf = store
            .create_folder(NewFolder {
                name: "Leaf".into(),
                parent_id: Some(middle.clone()),
                ..Default::default()
            })
            .unwrap();

        store.delete_folder(&middle).unwrap();
        assert_eq!(store.folder(&leaf).unwrap().parent_id.as_deref(), Some(top.as_str()));
    }

    #[test]
    fn delete_active_folder_clears_selection() {
        let mut store = empty_store();
        let folder = store
            .create_folder(NewFolder {
                name: "Work".into(),
                ..Default::default()
            })
            .unwrap();
        store.set_active_folder(Some(folder.clone())).unwrap();
        store.delete_folder(&folder).unwrap();
        assert!(store.active_folder_id().is_none());
    }

    #[test]
    fn update_folder_merges_fields() {
        let mut store = empty_store();
        let id = store
            .create_folder(NewFolder {
                name: "Work".into(),
                color: Some("#111111".into()),
                ..Default::default()
            })
            .unwrap();
        store
            .update_folder(
                &id,
                FolderUpdate {
                    name: Some("Career".into()),
                    color: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        let folder = store.folder(&id).unwrap();
        assert_eq!(folder.name, "Career");
        assert!(folder.color.is_none());
    }

    #[test]
    fn delete_tag_scrubs_every_note() {
        let mut store = empty_store();
        let tag = store.create_tag("Work", "#10b981").unwrap();
        let a = store.create_note().unwrap();
        let b = store.create_note().unwrap();
        store.add_tag_to_note(&a, &tag).unwrap();
        store.add_tag_to_note(&b, &tag).unwrap();

        store.delete_tag(&tag).unwrap();
        assert!(store.tag(&tag).is_none());
        for note in store.notes() {
            assert!(!note.tags.contains(&tag));
        }
    }

    #[test]
    fn add_tag_is_idempotent() {
        let mut store = empty_store();
        let tag = store.create_tag("Work", "#10b981").unwrap();
        let id = store.create_note().unwrap();
        store.add_tag_to_note(&id, &tag).unwrap();
        store.add_tag_to_note(&id, &tag).unwrap();
        assert_eq!(store.note(&id).unwrap().tags, vec![tag.clone()]);
    }

    #[test]
    fn remove_absent_tag_is_noop() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        let depth = store.history.depth();
        store.remove_tag_from_note(&id, "t-nope").unwrap();
        assert_eq!(store.history.depth(), depth);
    }

    #[test]
    fn tag_update_does_not_touch_version() {
        let mut store = empty_store();
        let tag = store.create_tag("Work", "#10b981").unwrap();
        let id = store.create_note().unwrap();
        store.add_tag_to_note(&id, &tag).unwrap();
        store.remove_tag_from_note(&id, &tag).unwrap();
        let note = store.note(&id).unwrap();
        assert_eq!(note.version, 1);
        assert!(note.previous_versions.is_empty());
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        store.update_note(&id, NoteUpdate::content("hello")).unwrap();
        let after = store.notes().to_vec();

        assert!(store.undo().unwrap());
        assert_eq!(store.note(&id).unwrap().content, "");
        assert!(store.redo().unwrap());
        assert_eq!(store.notes(), after.as_slice());
    }

    #[test]
    fn undo_with_no_history_is_noop() {
        let mut store = empty_store();
        assert!(!store.undo().unwrap());
        assert!(store.notes().is_empty());
    }

    #[test]
    fn fresh_commit_after_undo_disables_redo() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        store.update_note(&id, NoteUpdate::content("b")).unwrap();
        store.undo().unwrap();
        store.update_note(&id, NoteUpdate::content("c")).unwrap();
        assert!(!store.redo().unwrap());
        assert_eq!(store.note(&id).unwrap().content, "c");
    }

    #[test]
    fn protect_and_unprotect_note() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        assert!(store.protect_note(&id, Some("s3cret".into())).unwrap());
        let note = store.note(&id).unwrap();
        assert!(note.is_password_protected);
        assert_eq!(note.password.as_deref(), Some("s3cret"));

        assert!(store.protect_note(&id, None).unwrap());
        let note = store.note(&id).unwrap();
        assert!(!note.is_password_protected);
        assert!(note.password.is_none());

        assert!(!store.protect_note("missing", None).unwrap());
    }

    #[test]
    fn share_note_builds_and_clears_link() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        let link = store
            .share_note(&id, true, "https://noteflow.app/")
            .unwrap()
            .unwrap();
        assert_eq!(link, format!("https://noteflow.app/share/{}", id));
        let note = store.note(&id).unwrap();
        assert!(note.is_public);
        assert_eq!(note.public_link.as_deref(), Some(link.as_str()));

        assert!(store.share_note(&id, false, "https://noteflow.app").unwrap().is_none());
        let note = store.note(&id).unwrap();
        assert!(!note.is_public);
        assert!(note.public_link.is_none());
    }

    #[test]
    fn sharing_does_not_bump_version() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        store.share_note(&id, true, "https://noteflow.app").unwrap();
        store.protect_note(&id, Some("pw1234".into())).unwrap();
        assert_eq!(store.note(&id).unwrap().version, 1);
    }

    #[test]
    fn restore_version_appends_new_entry() {
        let mut store = empty_store();
        let id = store.create_note().unwrap();
        store.update_note(&id, NoteUpdate::content("first")).unwrap();
        store.update_note(&id, NoteUpdate::content("second")).unwrap();

        // Version 2 held "first"
        assert!(store.restore_version(&id, 2).unwrap());
        let note = store.note(&id).unwrap();
        assert_eq!(note.content, "first");
        assert_eq!(note.version, 4);
        assert_eq!(note.previous_versions.len(), 3);

        assert!(!store.restore_version(&id, 99).unwrap());
    }

    #[test]
    fn persists_through_reopen() {
        let mut storage = MemoryStorage::new();
        storage.set(NOTES_KEY, "[]").unwrap();
        storage.set(FOLDERS_KEY, "[]").unwrap();
        storage.set(TAGS_KEY, "[]").unwrap();
        let mut store = NoteStore::open(storage, None).unwrap();
        let id = store.create_note().unwrap();
        store.update_note(&id, NoteUpdate::content("kept")).unwrap();
        let folder = store
            .create_folder(NewFolder {
                name: "Work".into(),
                ..Default::default()
            })
            .unwrap();

        let NoteStore { storage, .. } = store;
        let reopened = NoteStore::open(storage, None).unwrap();
        assert_eq!(reopened.note(&id).unwrap().content, "kept");
        assert_eq!(reopened.note(&id).unwrap().version, 2);
        assert!(reopened.folder(&folder).is_some());
        assert_eq!(reopened.active_note_id(), Some(id.as_str()));
        // History does not survive a reopen
        assert!(!reopened.can_undo());
    }

    #[test]
    fn user_prefix_isolates_collections() {
        let mut storage = MemoryStorage::new();
        storage.set(NOTES_KEY, "[]").unwrap();
        storage.set(FOLDERS_KEY, "[]").unwrap();
        storage.set(TAGS_KEY, "[]").unwrap();
        let mut store = NoteStore::open(storage, Some("u1")).unwrap();
        store.create_note().unwrap();

        let NoteStore { storage, .. } = store;
        assert!(storage.get("user_u1_noteflow_notes").unwrap().is_some());
        // The signed-out namespace still holds the seeded empty array
        assert_eq!(storage.get(NOTES_KEY).unwrap().as_deref(), Some("[]"));
    }
}
