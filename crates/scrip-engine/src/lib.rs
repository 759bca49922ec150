//! # scrip-engine
//!
//! Turns Scrip documents into HTML in two phases:
//!
//! 1. [`builder`] maps the lossless syntax tree from `scrip-syntax` to an
//!    owned [`Document`] of [`Block`] values.
//! 2. [`Renderer`] walks that tree and writes HTML, delegating directives to
//!    [`transclusion`] and code blocks to a [`CodeExecutor`].
//!
//! ```no_run
//! use scrip_engine::{ProcessExecutor, RenderOptions, Renderer};
//! use std::path::Path;
//!
//! let mut renderer = Renderer::new(ProcessExecutor::default(), RenderOptions::default());
//! let html = renderer.compile_file(Path::new("notes/Notes.scrip"))?;
//! println!("wrote {}", html.display());
//! # Ok::<(), scrip_engine::RenderError>(())
//! ```

pub mod ast;
pub mod builder;
pub mod discovery;
pub mod error;
pub mod io;
pub mod render;
pub mod sandbox;
pub mod transclusion;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::*;
pub use builder::{build_document, parse_document};
pub use error::{BuildError, ExecutionError, RenderError};
pub use io::IoError;
pub use render::{RenderContext, RenderOptions, Renderer};
pub use sandbox::{CapturedOutput, CodeExecutor, ProcessExecutor};
