//! Directory auto-discovery for `#AutoNested`.

use std::fs;
use std::path::Path;

use crate::ast::{Block, Document, Hashtag, Paragraph};
use crate::io::IoError;

/// Names of the immediate subdirectories of `dir` that contain
/// `index_file_name`, sorted by name.
pub fn discover_indexed_folders(dir: &Path, index_file_name: &str) -> Result<Vec<String>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::NotFound(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir()
            && path.join(index_file_name).is_file()
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// The virtual document listing discovered folders: one level-2 heading per
/// folder, each holding a link to the folder's index document.
pub fn index_document(folders: &[String], index_file_name: &str) -> Document {
    let blocks = folders
        .iter()
        .map(|name| Block::Heading {
            level: 2,
            children: vec![Block::Hashtag(Hashtag::new(
                "Link",
                vec![format!("{name}/{index_file_name}"), name.clone()],
            ))],
        })
        .collect();

    Document::new(vec![Paragraph::new(blocks)])
}
