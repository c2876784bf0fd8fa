use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of folder icons.
///
/// Icons are identified by a closed list of string names resolved through
/// an explicit table, never by looking up arbitrary identifiers in an
/// icon library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FolderIcon {
    Folder,
    FolderArchive,
    FolderClock,
    FolderCode,
    FolderCog,
    FolderHeart,
    FolderInput,
    FolderKey,
    FolderLock,
    FolderOpen,
    FolderOutput,
    FolderSearch,
    FolderStar,
    FolderSymlink,
    FolderX,
}

impl FolderIcon {
    /// The stable string identifier, as persisted and as typed on the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            FolderIcon::Folder => "folder",
            FolderIcon::FolderArchive => "folder-archive",
            FolderIcon::FolderClock => "folder-clock",
            FolderIcon::FolderCode => "folder-code",
            FolderIcon::FolderCog => "folder-cog",
            FolderIcon::FolderHeart => "folder-heart",
            FolderIcon::FolderInput => "folder-input",
            FolderIcon::FolderKey => "folder-key",
            FolderIcon::FolderLock => "folder-lock",
            FolderIcon::FolderOpen => "folder-open",
            FolderIcon::FolderOutput => "folder-output",
            FolderIcon::FolderSearch => "folder-search",
            FolderIcon::FolderStar => "folder-star",
            FolderIcon::FolderSymlink => "folder-symlink",
            FolderIcon::FolderX => "folder-x",
        }
    }

    /// Parse an icon identifier. Unknown names are rejected.
    pub fn parse_icon(s: &str) -> Option<FolderIcon> {
        match s {
            "folder" => Some(FolderIcon::Folder),
            "folder-archive" => Some(FolderIcon::FolderArchive),
            "folder-clock" => Some(FolderIcon::FolderClock),
            "folder-code" => Some(FolderIcon::FolderCode),
            "folder-cog" => Some(FolderIcon::FolderCog),
            "folder-heart" => Some(FolderIcon::FolderHeart),
            "folder-input" => Some(FolderIcon::FolderInput),
            "folder-key" => Some(FolderIcon::FolderKey),
            "folder-lock" => Some(FolderIcon::FolderLock),
            "folder-open" => Some(FolderIcon::FolderOpen),
            "folder-output" => Some(FolderIcon::FolderOutput),
            "folder-search" => Some(FolderIcon::FolderSearch),
            "folder-star" => Some(FolderIcon::FolderStar),
            "folder-symlink" => Some(FolderIcon::FolderSymlink),
            "folder-x" => Some(FolderIcon::FolderX),
            _ => None,
        }
    }
}

/// A folder. Folders form a tree through `parent_id`; root folders have
/// no parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<FolderIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Fields for a new folder; id and creation timestamp are assigned by
/// the store.
#[derive(Debug, Clone, Default)]
pub struct NewFolder {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<FolderIcon>,
    pub parent_id: Option<String>,
}

/// A partial update to a folder. `None` fields are left untouched;
/// nullable fields use the nested-`Option` convention.
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
    pub icon: Option<Option<FolderIcon>>,
    pub parent_id: Option<Option<String>>,
}
