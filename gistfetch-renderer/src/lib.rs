//! # gistfetch-renderer
//!
//! Turns a fetched gist file into note text: a YAML frontmatter block
//! followed by the body.
//!
//! Markdown files keep their raw text as the body. Everything else is
//! rendered through the `notes/code.md.tera` template, which wraps the raw
//! text in a heading and a fenced code block.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gistfetch_core::Gist;
//! use gistfetch_renderer::Renderer;
//!
//! fn render_all(gist: &Gist, fetch: impl Fn(&str) -> String) {
//!     if let Ok(renderer) = Renderer::new() {
//!         for file in gist.files.values() {
//!             if let Ok(note) = renderer.render_note(gist, file, &fetch(&file.raw_url)) {
//!                 println!("{}: {} bytes", note.file_name, note.content.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod frontmatter;

pub use context::NoteContext;
pub use engine::{NoteKind, RenderedNote, Renderer, TemplateEngine};
pub use error::RenderError;
pub use frontmatter::NoteFrontmatter;
