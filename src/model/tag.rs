use serde::{Deserialize, Serialize};

/// A tag. Notes reference tags by id; deleting a tag scrubs its id from
/// every note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}
