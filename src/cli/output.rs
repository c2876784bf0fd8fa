use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Folder, Note, Tag};
use crate::ops::search::SearchHit;
use crate::sync::SyncReport;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct NoteJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub pinned: bool,
    pub version: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub protected: bool,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_link: Option<String>,
}

#[derive(Serialize)]
pub struct NoteDetailJson {
    #[serde(flatten)]
    pub note: NoteJson,
    pub content: String,
    pub previous_versions: usize,
}

#[derive(Serialize)]
pub struct FolderJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub notes: usize,
}

#[derive(Serialize)]
pub struct TagJson {
    pub id: String,
    pub name: String,
    pub color: String,
    pub notes: usize,
}

#[derive(Serialize)]
pub struct VersionJson {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub preview: String,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub note_id: String,
    pub title: String,
    pub field: &'static str,
    pub line: String,
}

#[derive(Serialize)]
pub struct SyncReportJson {
    pub provider: String,
    pub notes: usize,
    pub folders: usize,
    pub tags: usize,
    pub completed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Tag names for a note, in the note's tag order.
pub fn tag_names(note: &Note, tags: &[Tag]) -> Vec<String> {
    note.tags
        .iter()
        .filter_map(|id| tags.iter().find(|t| &t.id == id))
        .map(|t| t.name.clone())
        .collect()
}

pub fn note_to_json(note: &Note, tags: &[Tag]) -> NoteJson {
    NoteJson {
        id: note.id.clone(),
        title: note.title.clone(),
        folder_id: note.folder_id.clone(),
        pinned: note.is_pinned,
        version: note.version,
        tags: tag_names(note, tags),
        created_at: note.created_at,
        updated_at: note.updated_at,
        protected: note.is_password_protected,
        public: note.is_public,
        public_link: note.public_link.clone(),
    }
}

pub fn note_to_detail_json(note: &Note, tags: &[Tag]) -> NoteDetailJson {
    NoteDetailJson {
        note: note_to_json(note, tags),
        content: note.content.clone(),
        previous_versions: note.previous_versions.len(),
    }
}

pub fn search_hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        note_id: hit.note_id.clone(),
        title: hit.note_title.clone(),
        field: hit.field.as_str(),
        line: hit.line.clone(),
    }
}

pub fn sync_report_to_json(report: &SyncReport) -> SyncReportJson {
    SyncReportJson {
        provider: report.provider.clone(),
        notes: report.notes,
        folders: report.folders,
        tags: report.tags,
        completed_at: report.completed_at,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// First chunk of an id, enough to paste back as a prefix.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Format a single note as a one-line summary
pub fn format_note_line(note: &Note, tags: &[Tag]) -> String {
    let pin = if note.is_pinned { '*' } else { ' ' };
    let names = tag_names(note, tags);
    let tags_str = if names.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            names
                .iter()
                .map(|n| format!("#{}", n))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };
    let lock = if note.is_password_protected { " [locked]" } else { "" };
    let public = if note.is_public { " [public]" } else { "" };
    format!(
        "[{}] {}  {}{}{}{}",
        pin,
        short_id(&note.id),
        note.title,
        tags_str,
        lock,
        public
    )
}

/// Format full note detail
pub fn format_note_detail(note: &Note, tags: &[Tag], folder: Option<&Folder>) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "[{}] {}",
        if note.is_pinned { '*' } else { ' ' },
        note.title
    ));
    lines.push(format!("id: {}", note.id));
    if let Some(folder) = folder {
        lines.push(format!("folder: {} ({})", folder.name, short_id(&folder.id)));
    }
    let names = tag_names(note, tags);
    if !names.is_empty() {
        lines.push(format!(
            "tags: {}",
            names
                .iter()
                .map(|n| format!("#{}", n))
                .collect::<Vec<_>>()
                .join(" ")
        ));
    }
    lines.push(format!(
        "created: {}",
        note.created_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    ));
    lines.push(format!(
        "updated: {}",
        note.updated_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    ));
    lines.push(format!(
        "version: {} ({} previous)",
        note.version,
        note.previous_versions.len()
    ));
    if let Some(bg) = &note.background_color {
        lines.push(format!("background: {}", bg));
    }
    if note.is_password_protected {
        lines.push("protection: password".to_string());
    }
    if note.is_public {
        match &note.public_link {
            Some(link) => lines.push(format!("public: {}", link)),
            None => lines.push("public: yes".to_string()),
        }
    }
    if !note.attachments.is_empty() {
        lines.push(format!("attachments: {}", note.attachments.len()));
    }
    if !note.content.is_empty() {
        lines.push(String::new());
        lines.extend(note.content.lines().map(String::from));
    }
    lines
}

/// Format a folder listing line
pub fn format_folder_line(folder: &Folder, note_count: usize, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let icon = folder
        .icon
        .map(|i| format!(" <{}>", i.as_str()))
        .unwrap_or_default();
    format!(
        "{}{} ({})  {} notes{}",
        indent,
        folder.name,
        short_id(&folder.id),
        note_count,
        icon
    )
}

/// Format a tag listing line
pub fn format_tag_line(tag: &Tag, note_count: usize) -> String {
    format!(
        "#{} ({})  {}  {} notes",
        tag.name,
        short_id(&tag.id),
        tag.color,
        note_count
    )
}
