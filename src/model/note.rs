use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to every freshly created note.
pub const UNTITLED: &str = "Untitled Note";

/// One archived content state of a note.
///
/// Entries are appended to `Note::previous_versions` when the content
/// changes, and never removed or rewritten afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteVersion {
    pub content: String,
    pub updated_at: DateTime<Utc>,
    pub version: u32,
}

/// A markdown note.
///
/// Field names serialize in camelCase so data persisted by earlier
/// releases loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    /// Markdown body text.
    pub content: String,
    /// Containing folder; `None` = root level.
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Starts at 1, bumped only when `content` actually changes.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Append-only chain of prior content states, oldest first.
    #[serde(default)]
    pub previous_versions: Vec<NoteVersion>,
    /// Tag ids, insertion order, no duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub is_password_protected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_link: Option<String>,
    /// Attachment URLs or data URIs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

fn default_version() -> u32 {
    1
}

impl Note {
    /// Create an empty untitled note in the given folder.
    pub fn new(id: String, folder_id: Option<String>, background: Option<String>) -> Self {
        let now = Utc::now();
        Note {
            id,
            title: UNTITLED.to_string(),
            content: String::new(),
            folder_id,
            is_pinned: false,
            created_at: now,
            updated_at: now,
            version: 1,
            previous_versions: Vec::new(),
            tags: Vec::new(),
            background_color: background,
            is_password_protected: false,
            password: None,
            is_public: false,
            public_link: None,
            attachments: Vec::new(),
        }
    }

    /// Look up an archived version by its version number.
    pub fn previous_version(&self, version: u32) -> Option<&NoteVersion> {
        self.previous_versions.iter().find(|v| v.version == version)
    }
}

/// A partial update to a note. `None` fields are left untouched.
///
/// Nullable note fields use a nested `Option`: `Some(None)` clears the
/// field, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<Option<String>>,
    pub is_pinned: Option<bool>,
    pub background_color: Option<Option<String>>,
    pub is_password_protected: Option<bool>,
    pub password: Option<Option<String>>,
    pub is_public: Option<bool>,
    pub public_link: Option<Option<String>>,
    pub attachments: Option<Vec<String>>,
}

impl NoteUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        NoteUpdate {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        NoteUpdate {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// True when no field is set; applying it still refreshes `updatedAt`.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.folder_id.is_none()
            && self.is_pinned.is_none()
            && self.background_color.is_none()
            && self.is_password_protected.is_none()
            && self.password.is_none()
            && self.is_public.is_none()
            && self.public_link.is_none()
            && self.attachments.is_none()
    }
}
