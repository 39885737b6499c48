//! # gistfetch-client
//!
//! Read-only access to the GitHub gist API.
//!
//! The sync pipeline talks to [`GistSource`]; [`GistClient`] is the HTTP
//! implementation used by the binary.

pub mod client;
pub mod error;
pub mod source;

pub use client::{GistClient, DEFAULT_API_BASE};
pub use error::ClientError;
pub use source::GistSource;
