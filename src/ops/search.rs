use regex::Regex;

use crate::model::{Note, Tag};

/// Which field of a note (or tag) matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Content,
    TagName,
}

impl MatchField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Content => "content",
            MatchField::TagName => "tag",
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub note_id: String,
    pub note_title: String,
    pub field: MatchField,
    /// The matching line of text (the title itself, a content line, or
    /// the tag name).
    pub line: String,
}

/// Search notes by regex over titles and content, and through tag names
/// (a tag-name hit reports every note carrying that tag).
pub fn search_notes(notes: &[Note], tags: &[Tag], re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    for note in notes {
        if re.is_match(&note.title) {
            hits.push(SearchHit {
                note_id: note.id.clone(),
                note_title: note.title.clone(),
                field: MatchField::Title,
                line: note.title.clone(),
            });
        }
        for line in note.content.lines() {
            if re.is_match(line) {
                hits.push(SearchHit {
                    note_id: note.id.clone(),
                    note_title: note.title.clone(),
                    field: MatchField::Content,
                    line: line.to_string(),
                });
            }
        }
    }

    for tag in tags {
        if !re.is_match(&tag.name) {
            continue;
        }
        for note in notes {
            if note.tags.iter().any(|t| t == &tag.id) {
                hits.push(SearchHit {
                    note_id: note.id.clone(),
                    note_title: note.title.clone(),
                    field: MatchField::TagName,
                    line: tag.name.clone(),
                });
            }
        }
    }

    hits
}
