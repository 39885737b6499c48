//! Domain types for gistfetch.
//!
//! [`Gist`] and [`GistFile`] mirror the GitHub listing payload and are
//! deserialized straight from it. [`OwnerName`] and [`MirrorPath`] are the
//! validated forms of the user's settings; construct them with `parse`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Characters treated as path separators in user-supplied names.
const SEPARATORS: &[char] = &['/', '\\'];

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// GitHub's identifier for a gist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GistId(pub String);

impl fmt::Display for GistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for GistId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GistId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A GitHub account name whose gists are mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OwnerName(String);

/// GitHub caps login names at 39 characters.
const MAX_OWNER_LEN: usize = 39;

impl OwnerName {
    /// Validate a raw owner string: non-empty, at most 39 characters,
    /// ASCII alphanumerics and `-` only.
    pub fn parse(raw: &str) -> Result<Self, SettingsError> {
        let owner = raw.trim();
        let invalid = |reason: &str| SettingsError::InvalidOwner {
            owner: raw.to_string(),
            reason: reason.to_string(),
        };
        if owner.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if owner.len() > MAX_OWNER_LEN {
            return Err(invalid("longer than 39 characters"));
        }
        if !owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("only ASCII letters, digits and '-' are allowed"));
        }
        Ok(Self(owner.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Vault-relative folder that receives one subfolder per gist.
///
/// Stored as normalized components; an empty list is the vault root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MirrorPath {
    components: Vec<String>,
}

impl MirrorPath {
    /// Normalize a user-supplied mirror path.
    ///
    /// Leading and trailing separators are stripped (`/Gists/` → `Gists`),
    /// `.` components are dropped, and `..` components or NUL characters are
    /// rejected so the result can never escape the vault.
    pub fn parse(raw: &str) -> Result<Self, SettingsError> {
        let invalid = |reason: &str| SettingsError::InvalidMirrorPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };
        if raw.contains('\0') {
            return Err(invalid("contains a NUL character"));
        }

        let mut components = Vec::new();
        for part in raw.trim().split(SEPARATORS) {
            match part.trim() {
                "" | "." => continue,
                ".." => return Err(invalid("'..' components are not allowed")),
                p => components.push(p.to_string()),
            }
        }
        Ok(Self { components })
    }

    /// `true` when the mirror is the vault root itself.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Path relative to the vault root (empty for the root).
    pub fn to_relative(&self) -> PathBuf {
        self.components.iter().collect()
    }
}

impl fmt::Display for MirrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.components.join("/"))
    }
}

// ---------------------------------------------------------------------------
// Remote payloads
// ---------------------------------------------------------------------------

/// Language GitHub reports for files that are already markdown.
pub const MARKDOWN_LANGUAGE: &str = "Markdown";

/// One file inside a gist, as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFile {
    pub filename: String,
    #[serde(default)]
    pub language: Option<String>,
    pub raw_url: String,
    #[serde(default)]
    pub size: u64,
    /// MIME type, e.g. `text/plain`.
    #[serde(rename = "type", default)]
    pub content_type: String,
}

impl GistFile {
    /// Files GitHub tags as Markdown are written without a code fence.
    pub fn is_markdown(&self) -> bool {
        self.language.as_deref() == Some(MARKDOWN_LANGUAGE)
    }

    /// Language tag for the code fence; empty when GitHub did not detect one.
    pub fn language_tag(&self) -> &str {
        self.language.as_deref().unwrap_or("")
    }

    /// File name of the note in the vault: `filename` for markdown files,
    /// `filename.md` for everything else.
    pub fn note_file_name(&self) -> String {
        if self.is_markdown() {
            self.filename.clone()
        } else {
            format!("{}.md", self.filename)
        }
    }
}

/// A gist as returned by `GET /users/{owner}/gists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gist {
    pub id: GistId,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Keyed by filename; iteration is in filename order.
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl Gist {
    /// Name of the per-gist folder under the mirror path.
    ///
    /// The description is trimmed and path separators become `-`. A missing,
    /// blank, `.` or `..` description falls back to the gist id.
    pub fn folder_name(&self) -> String {
        let description = self.description.as_deref().unwrap_or("").trim();
        let name = description.replace(SEPARATORS, "-");
        match name.as_str() {
            "" | "." | ".." => self.id.0.clone(),
            _ => name,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn file(filename: &str, language: Option<&str>) -> GistFile {
        GistFile {
            filename: filename.to_string(),
            language: language.map(str::to_string),
            raw_url: format!("https://gist.githubusercontent.com/raw/{filename}"),
            size: 12,
            content_type: "text/plain".to_string(),
        }
    }

    fn gist_with_description(description: Option<&str>) -> Gist {
        let now = Utc::now();
        Gist {
            id: GistId::from("aa5a315d61ae9438b18d"),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
            files: BTreeMap::new(),
            public: true,
            html_url: None,
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(GistId::from("abc").to_string(), "abc");
        assert_eq!(OwnerName::parse("octocat").unwrap().to_string(), "octocat");
    }

    #[test]
    fn markdown_file_keeps_its_name() {
        let f = file("README.md", Some("Markdown"));
        assert!(f.is_markdown());
        assert_eq!(f.note_file_name(), "README.md");
    }

    #[test]
    fn other_files_get_md_suffix() {
        let f = file("notes.txt", Some("Python"));
        assert!(!f.is_markdown());
        assert_eq!(f.note_file_name(), "notes.txt.md");
    }

    #[test]
    fn markdown_detection_ignores_extension() {
        let f = file("draft.md", None);
        assert!(!f.is_markdown());
        assert_eq!(f.note_file_name(), "draft.md.md");
        assert_eq!(f.language_tag(), "");
    }

    #[test]
    fn folder_name_uses_description() {
        assert_eq!(gist_with_description(Some("demo")).folder_name(), "demo");
        assert_eq!(gist_with_description(Some("  demo  ")).folder_name(), "demo");
    }

    #[test]
    fn folder_name_replaces_separators() {
        let gist = gist_with_description(Some("a/b\\c"));
        assert_eq!(gist.folder_name(), "a-b-c");
    }

    #[test]
    fn folder_name_falls_back_to_id() {
        for description in [None, Some(""), Some("   "), Some("."), Some("..")] {
            let gist = gist_with_description(description);
            assert_eq!(gist.folder_name(), "aa5a315d61ae9438b18d");
        }
    }

    #[test]
    fn gist_deserializes_api_payload() {
        let json = r#"{
            "id": "aa5a315d61ae9438b18d",
            "description": "demo",
            "public": true,
            "created_at": "2024-01-02T03:04:05Z",
            "updated_at": "2024-02-03T04:05:06Z",
            "html_url": "https://gist.github.com/aa5a315d61ae9438b18d",
            "files": {
                "notes.txt": {
                    "filename": "notes.txt",
                    "type": "text/plain",
                    "language": null,
                    "raw_url": "https://gist.githubusercontent.com/octocat/aa5a/raw/notes.txt",
                    "size": 42
                }
            },
            "owner": {"login": "octocat"}
        }"#;
        let gist: Gist = serde_json::from_str(json).expect("deserialize");
        assert_eq!(gist.id, GistId::from("aa5a315d61ae9438b18d"));
        let f = &gist.files["notes.txt"];
        assert_eq!(f.content_type, "text/plain");
        assert_eq!(f.language, None);
        assert_eq!(f.size, 42);
    }
}
