//! YAML frontmatter for gist notes.
//!
//! Every note starts with a `---` delimited block carrying the gist's
//! metadata. Markdown gists may already have their own block; those keys are
//! kept and the generated ones overwrite matching keys.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use gistfetch_core::{Gist, GistFile};

use crate::error::RenderError;

/// Tags attached to every mirrored note.
pub const GIST_TAGS: [&str; 2] = ["type/github-gist", "Resource"];

/// Generated metadata, serialized in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteFrontmatter {
    #[serde(rename = "content-type")]
    pub content_type: String,
    pub created: DateTime<Utc>,
    pub filename: String,
    pub modified: DateTime<Utc>,
    pub size: u64,
    pub tags: Vec<String>,
    pub uid: String,
}

impl NoteFrontmatter {
    pub fn for_file(gist: &Gist, file: &GistFile) -> Self {
        Self {
            content_type: file.content_type.clone(),
            created: gist.created_at,
            filename: file.filename.clone(),
            modified: gist.updated_at,
            size: file.size,
            tags: GIST_TAGS.iter().map(|t| t.to_string()).collect(),
            uid: gist.id.0.clone(),
        }
    }
}

/// Split `text` into `(yaml, body)` when it opens with a frontmatter block.
///
/// The opening `---` must be the very first line; the block ends at the next
/// line consisting of `---`. Returns `None` when there is no complete block.
pub fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(&['\r', '\n'][..]) == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Prepend the frontmatter block to `body`.
///
/// With `merge_existing`, a frontmatter block already at the top of `body` is
/// folded into the generated one and removed from the body. A block that is
/// not a YAML mapping is left in the body untouched.
///
/// Returns `(full note text, body)`.
pub fn compose(
    frontmatter: &NoteFrontmatter,
    body: &str,
    merge_existing: bool,
) -> Result<(String, String), RenderError> {
    let (mut mapping, body) = match split_frontmatter(body).filter(|_| merge_existing) {
        Some((yaml, rest)) => match serde_yaml::from_str::<Value>(yaml) {
            Ok(Value::Mapping(existing)) => (existing, rest),
            Ok(Value::Null) => (Mapping::new(), rest),
            Ok(_) | Err(_) => {
                tracing::warn!("ignoring unparseable frontmatter in {}", frontmatter.filename);
                (Mapping::new(), body)
            }
        },
        None => (Mapping::new(), body),
    };

    if let Value::Mapping(generated) = serde_yaml::to_value(frontmatter)? {
        for (key, value) in generated {
            mapping.insert(key, value);
        }
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(mapping))?;
    let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);
    Ok((format!("---\n{yaml}---\n{body}"), body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gistfetch_core::GistId;
    use std::collections::BTreeMap;

    fn make_frontmatter() -> NoteFrontmatter {
        let file = GistFile {
            filename: "README.md".to_string(),
            language: Some("Markdown".to_string()),
            raw_url: "https://gist.githubusercontent.com/raw/README.md".to_string(),
            size: 64,
            content_type: "text/markdown".to_string(),
        };
        let gist = Gist {
            id: GistId::from("abc123"),
            description: Some("demo".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
            files: BTreeMap::new(),
            public: true,
            html_url: None,
        };
        NoteFrontmatter::for_file(&gist, &file)
    }

    fn parse_block(note: &str) -> Value {
        let (yaml, _) = split_frontmatter(note).expect("frontmatter block");
        serde_yaml::from_str(yaml).expect("yaml mapping")
    }

    #[test]
    fn split_requires_opening_line() {
        assert!(split_frontmatter("# Title\n---\n").is_none());
        assert!(split_frontmatter("---\nunterminated: true\n").is_none());
    }

    #[test]
    fn split_returns_yaml_and_body() {
        let (yaml, body) = split_frontmatter("---\na: 1\n---\nbody\n").unwrap();
        assert_eq!(yaml, "a: 1\n");
        assert_eq!(body, "body\n");
    }

    #[test]
    fn split_handles_empty_block_and_crlf() {
        assert_eq!(split_frontmatter("---\n---\n"), Some(("", "")));
        assert_eq!(
            split_frontmatter("---\r\na: 1\r\n---\r\nbody"),
            Some(("a: 1\r\n", "body"))
        );
    }

    #[test]
    fn compose_prepends_block_and_keeps_body() {
        let fm = make_frontmatter();
        let (note, body) = compose(&fm, "# Hello\n", true).expect("compose");
        assert!(note.starts_with("---\n"));
        assert!(note.ends_with("---\n# Hello\n"));
        assert_eq!(body, "# Hello\n");
    }

    #[test]
    fn compose_emits_all_fields_in_order() {
        let fm = make_frontmatter();
        let (note, _) = compose(&fm, "", false).expect("compose");
        let block = parse_block(&note);
        let keys: Vec<&str> = block
            .as_mapping()
            .expect("mapping")
            .iter()
            .filter_map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(
            keys,
            ["content-type", "created", "filename", "modified", "size", "tags", "uid"]
        );
        assert_eq!(block["content-type"].as_str(), Some("text/markdown"));
        assert_eq!(block["filename"].as_str(), Some("README.md"));
        assert_eq!(block["uid"].as_str(), Some("abc123"));
        assert_eq!(block["size"].as_u64(), Some(64));
        assert_eq!(block["created"].as_str(), Some("2024-01-02T03:04:05Z"));
        assert_eq!(block["modified"].as_str(), Some("2024-02-03T04:05:06Z"));
        let tags: Vec<&str> = block["tags"]
            .as_sequence()
            .unwrap()
            .iter()
            .filter_map(|t| t.as_str())
            .collect();
        assert_eq!(tags, GIST_TAGS);
    }

    #[test]
    fn compose_merges_existing_block() {
        let fm = make_frontmatter();
        let raw = "---\ntitle: Mine\nuid: stale\n---\n# Hello\n";
        let (note, body) = compose(&fm, raw, true).expect("compose");
        let block = parse_block(&note);
        assert_eq!(block["title"].as_str(), Some("Mine"));
        assert_eq!(block["uid"].as_str(), Some("abc123"));
        assert_eq!(body, "# Hello\n");
        assert_eq!(note.matches("---\n").count(), 2);
    }

    #[test]
    fn compose_without_merge_leaves_body_alone() {
        let fm = make_frontmatter();
        let raw = "---\ntitle: Mine\n---\n";
        let (_, body) = compose(&fm, raw, false).expect("compose");
        assert_eq!(body, raw);
    }

    #[test]
    fn compose_keeps_non_mapping_block_in_body() {
        let fm = make_frontmatter();
        let raw = "---\n- just\n- a list\n---\ntext\n";
        let (_, body) = compose(&fm, raw, true).expect("compose");
        assert_eq!(body, raw);
    }
}
