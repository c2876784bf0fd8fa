use serde_json::json;

use crate::model::Note;

/// Output formats for note export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Html,
    Json,
    Text,
}

impl ExportFormat {
    pub fn parse_format(s: &str) -> Result<ExportFormat, String> {
        match s {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(format!(
                "unknown format '{}' (expected: markdown, html, json, text)",
                s
            )),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }
}

/// Render a note in the given format.
pub fn export_note(note: &Note, format: ExportFormat) -> String {
    match format {
        ExportFormat::Markdown => note.content.clone(),
        ExportFormat::Html => html_document(note),
        ExportFormat::Json => {
            let value = json!({
                "title": note.title,
                "content": note.content,
                "createdAt": note.created_at,
                "updatedAt": note.updated_at,
            });
            serde_json::to_string_pretty(&value).expect("json export cannot fail")
        }
        // Plain text keeps the prose and drops the markdown punctuation
        ExportFormat::Text => note
            .content
            .chars()
            .filter(|c| !matches!(c, '#' | '*' | '_' | '~' | '`'))
            .collect(),
    }
}

/// Suggested filename for an exported note.
pub fn export_filename(note: &Note, format: ExportFormat) -> String {
    let stem = if note.title.is_empty() {
        "Untitled"
    } else {
        &note.title
    };
    format!("{}.{}", stem, format.extension())
}

fn html_document(note: &Note) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>{title}</title>
  <meta charset="utf-8">
  <style>
    body {{ font-family: system-ui, sans-serif; line-height: 1.5; max-width: 800px; margin: 0 auto; padding: 2rem; }}
    img {{ max-width: 100%; }}
    pre {{ background: #f5f5f5; padding: 1rem; overflow-x: auto; }}
    blockquote {{ border-left: 4px solid #ddd; margin-left: 0; padding-left: 1rem; color: #666; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div class="content">
    {content}
  </div>
</body>
</html>"#,
        title = note.title,
        content = note.content,
    )
}
