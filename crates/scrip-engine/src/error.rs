use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::io::IoError;

/// Failures while mapping a syntax tree to the block model.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Malformed directive: {directive}")]
    MalformedDirective { directive: String },
    #[error("Malformed {marker} marker: {text:?}")]
    MalformedMarker { marker: &'static str, text: String },
}

/// Failures while running a code block.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` did not finish within {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },
    #[error("`{command}` exited with {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("Document not found: {}", .0.display())]
    MissingDocument(PathBuf),
    #[error("Malformed directive: {directive}")]
    MalformedDirective { directive: String },
    #[error("Cyclic transclusion of {} via {}", .path.display(), format_chain(.chain))]
    CyclicTransclusion { path: PathBuf, chain: Vec<PathBuf> },
    #[error("Invalid heading level {0}, expected 1 to 6")]
    InvalidHeadingLevel(u8),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl RenderError {
    pub(crate) fn malformed(directive: impl Into<String>) -> Self {
        RenderError::MalformedDirective {
            directive: directive.into(),
        }
    }

    pub(crate) fn cyclic(path: &Path, chain: &[PathBuf]) -> Self {
        RenderError::CyclicTransclusion {
            path: path.to_path_buf(),
            chain: chain.to_vec(),
        }
    }
}
