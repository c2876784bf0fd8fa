//! First-run sample data, seeded when no persisted notes exist yet.

use chrono::Utc;

use crate::model::{Folder, Note, Tag};

const WELCOME: &str = "\
# Welcome to noteflow

This is your new home for all your notes and ideas.

## Features:
- **Markdown Support**: Format your notes with Markdown
- **Folders**: Organize your notes with folders
- **Pinned Notes**: Keep important notes at the top
- **Version History**: Every content edit is kept
- **Undo/Redo**: Step back through your changes

Try creating a new note or folder to get started!";

const SHOPPING: &str = "\
## Grocery List
- Milk
- Eggs
- Bread
- Apples
- Bananas
- Chicken
- Rice
- Pasta";

const IDEAS: &str = "\
# Project Ideas
1. **Mobile App**: Note-taking app with cloud sync
2. **Website**: Personal portfolio with blog
3. **Game**: 2D platformer with pixel art

## Technologies to explore:
- React Native
- Three.js
- WebAssembly";

pub fn sample_folders() -> Vec<Folder> {
    let now = Utc::now();
    ["Personal", "Work", "Projects"]
        .iter()
        .enumerate()
        .map(|(i, name)| Folder {
            id: format!("f{}", i + 1),
            name: name.to_string(),
            created_at: now,
            color: None,
            icon: None,
            parent_id: None,
        })
        .collect()
}

pub fn sample_notes() -> Vec<Note> {
    let seeds: [(&str, &str, &str, Option<&str>, bool); 3] = [
        ("n1", "Welcome to noteflow", WELCOME, None, true),
        ("n2", "Shopping List", SHOPPING, Some("f1"), false),
        ("n3", "Project Ideas", IDEAS, Some("f3"), true),
    ];
    seeds
        .iter()
        .map(|(id, title, content, folder, pinned)| {
            let mut note = Note::new(id.to_string(), folder.map(String::from), None);
            note.title = title.to_string();
            note.content = content.to_string();
            note.is_pinned = *pinned;
            note
        })
        .collect()
}

pub fn sample_tags() -> Vec<Tag> {
    vec![
        Tag {
            id: "t1".into(),
            name: "Important".into(),
            color: "#ef4444".into(),
        },
        Tag {
            id: "t2".into(),
            name: "Work".into(),
            color: "#10b981".into(),
        },
        Tag {
            id: "t3".into(),
            name: "Ideas".into(),
            color: "#6366f1".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_notes_reference_sample_folders() {
        let folder_ids: Vec<String> = sample_folders().into_iter().map(|f| f.id).collect();
        for note in sample_notes() {
            if let Some(folder) = &note.folder_id {
                assert!(folder_ids.contains(folder), "dangling folder {}", folder);
            }
        }
    }

    #[test]
    fn sample_notes_start_at_version_one() {
        for note in sample_notes() {
            assert_eq!(note.version, 1);
            assert!(note.previous_versions.is_empty());
        }
    }
}
