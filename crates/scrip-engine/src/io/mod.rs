use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of Scrip source files, without the dot.
pub const MARKUP_EXTENSION: &str = "scrip";

/// Name of the stylesheet written next to every output file.
pub const STYLESHEET_FILE_NAME: &str = "scrip.css";

const DEFAULT_STYLESHEET: &str = include_str!("../../assets/scrip.css");

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a Scrip source file and return its content
pub fn read_document(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Absolute, symlink-free form of a document path.
pub fn canonical_document(path: &Path) -> Result<PathBuf, IoError> {
    if !path.is_file() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::canonicalize(path).map_err(IoError::Io)
}

/// Resolve a `/`-separated directive target against the directory of the
/// document that references it.
pub fn resolve_target(base_dir: &Path, target: &str) -> PathBuf {
    RelativePath::new(target).to_logical_path(base_dir)
}

/// Output file for a source file: same name, `.html` extension.
pub fn html_path(source: &Path) -> PathBuf {
    source.with_extension("html")
}

/// Whether a directive target names a Scrip source file.
pub fn is_markup_target(target: &str) -> bool {
    RelativePath::new(target).extension() == Some(MARKUP_EXTENSION)
}

/// The href of a compiled link target: `notes/a.scrip` becomes `notes/a.html`.
pub fn html_target(target: &str) -> String {
    RelativePath::new(target).with_extension("html").into_string()
}

/// Write the stylesheet into `dir`, overwriting any existing copy.
///
/// Copies `source` when given, otherwise writes the built-in stylesheet.
pub fn write_stylesheet(dir: &Path, source: Option<&Path>) -> Result<PathBuf, IoError> {
    let target = dir.join(STYLESHEET_FILE_NAME);
    match source {
        Some(source) => {
            if !source.exists() {
                return Err(IoError::NotFound(source.to_path_buf()));
            }
            fs::copy(source, &target)?;
        }
        None => fs::write(&target, DEFAULT_STYLESHEET)?,
    }
    Ok(target)
}
