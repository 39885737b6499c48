//! Template context — serializable rendering payload built from a gist file.

use serde::{Deserialize, Serialize};

use gistfetch_core::{Gist, GistFile};

use crate::error::RenderError;

/// Variables available to note templates.
///
/// `filename`, `language` and `content` are what the embedded template uses;
/// the gist-level fields are there for user overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteContext {
    pub filename: String,
    /// Fence tag; empty when GitHub did not detect a language.
    pub language: String,
    /// Raw file text, inserted verbatim.
    pub content: String,
    pub description: String,
    pub gist_id: String,
    pub html_url: Option<String>,
    pub size: u64,
}

impl NoteContext {
    /// Build a context for one file of `gist` with its fetched `content`.
    pub fn from_file(gist: &Gist, file: &GistFile, content: &str) -> Self {
        Self {
            filename: file.filename.clone(),
            language: file.language_tag().to_string(),
            content: content.to_string(),
            description: gist.description.clone().unwrap_or_default(),
            gist_id: gist.id.0.clone(),
            html_url: gist.html_url.clone(),
            size: file.size,
        }
    }

    /// Convert to a Tera rendering context.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gistfetch_core::GistId;
    use std::collections::BTreeMap;

    fn make_gist(description: Option<&str>) -> (Gist, GistFile) {
        let now = Utc::now();
        let file = GistFile {
            filename: "notes.txt".to_string(),
            language: None,
            raw_url: "https://gist.githubusercontent.com/raw/notes.txt".to_string(),
            size: 7,
            content_type: "text/plain".to_string(),
        };
        let gist = Gist {
            id: GistId::from("abc123"),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
            files: BTreeMap::from([(file.filename.clone(), file.clone())]),
            public: true,
            html_url: None,
        };
        (gist, file)
    }

    #[test]
    fn missing_language_becomes_empty_tag() {
        let (gist, file) = make_gist(Some("demo"));
        let ctx = NoteContext::from_file(&gist, &file, "content");
        assert_eq!(ctx.language, "");
        assert_eq!(ctx.description, "demo");
        assert_eq!(ctx.gist_id, "abc123");
    }

    #[test]
    fn missing_description_becomes_empty() {
        let (gist, file) = make_gist(None);
        let ctx = NoteContext::from_file(&gist, &file, "content");
        assert_eq!(ctx.description, "");
    }

    #[test]
    fn to_tera_context_succeeds() {
        let (gist, file) = make_gist(Some("demo"));
        let ctx = NoteContext::from_file(&gist, &file, "content");
        ctx.to_tera_context().expect("context conversion");
    }
}
