//! Tera rendering engine — [`NoteKind`], [`TemplateEngine`] and [`Renderer`].
//!
//! # Note shapes
//!
//! | Kind     | Chosen when                   | File name         | Body                      |
//! |----------|-------------------------------|-------------------|---------------------------|
//! | Markdown | `language == "Markdown"`      | `<filename>`      | raw text, unchanged       |
//! | Code     | anything else                 | `<filename>.md`   | `notes/code.md.tera`      |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use gistfetch_core::{Gist, GistFile};

use crate::context::NoteContext;
use crate::error::RenderError;
use crate::frontmatter::{self, NoteFrontmatter};

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

/// Template wrapping non-markdown files in a heading and a fenced block.
pub const CODE_NOTE_TEMPLATE: &str = "notes/code.md.tera";

const TPLS: &[(&str, &str)] = &[(
    CODE_NOTE_TEMPLATE,
    include_str!("templates/code_note.md.tera"),
)];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("loaded user template {name} from {}", path.display());
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// NoteKind
// ---------------------------------------------------------------------------

/// How a gist file becomes a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    /// Already markdown: the raw text is the body.
    Markdown,
    /// Anything else: wrapped in a heading and a fenced code block.
    Code,
}

impl NoteKind {
    pub fn of(file: &GistFile) -> Self {
        if file.is_markdown() {
            NoteKind::Markdown
        } else {
            NoteKind::Code
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering note bodies with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded defaults
/// (e.g. `notes/code.md.tera`). Template names are normalised to lowercase
/// relative paths.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render the body for a note of `kind`.
    pub fn render_body(&self, ctx: &NoteContext, kind: NoteKind) -> Result<String, RenderError> {
        match kind {
            NoteKind::Markdown => Ok(ctx.content.clone()),
            NoteKind::Code => {
                let tera_ctx = ctx.to_tera_context()?;
                Ok(self.tera.render(CODE_NOTE_TEMPLATE, &tera_ctx)?)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// A fully rendered note, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNote {
    /// File name inside the gist's folder.
    pub file_name: String,
    pub kind: NoteKind,
    /// Frontmatter block followed by the body.
    pub content: String,
    /// The body alone.
    pub body: String,
}

/// Builds complete notes (frontmatter + body) for gist files.
///
/// Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(None)? })
    }

    /// Construct a [`Renderer`] whose templates may be overridden from `dir`.
    pub fn with_user_templates(dir: &Path) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(Some(dir))? })
    }

    /// Render the note for one `file` of `gist` from its fetched `raw` text.
    pub fn render_note(
        &self,
        gist: &Gist,
        file: &GistFile,
        raw: &str,
    ) -> Result<RenderedNote, RenderError> {
        let kind = NoteKind::of(file);
        let ctx = NoteContext::from_file(gist, file, raw);
        let body = self.engine.render_body(&ctx, kind)?;
        let (content, body) = frontmatter::compose(
            &NoteFrontmatter::for_file(gist, file),
            &body,
            kind == NoteKind::Markdown,
        )?;
        Ok(RenderedNote {
            file_name: file.note_file_name(),
            kind,
            content,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
