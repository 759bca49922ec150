use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::error::ExecutionError;
use crate::sandbox::{CapturedOutput, CodeExecutor};

/// Create a temporary notes directory with test files
pub fn create_test_notes_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content, creating parent folders as needed
pub fn create_test_file(notes_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = notes_dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Executor that answers from a fixed result and records every call.
pub struct FakeExecutor {
    result: Result<String, String>,
    pub calls: RefCell<Vec<(String, String)>>,
}

impl FakeExecutor {
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            result: Ok(stdout.to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            result: Err(stderr.to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl CodeExecutor for FakeExecutor {
    fn execute(&self, command: &str, code: &str) -> Result<CapturedOutput, ExecutionError> {
        self.calls
            .borrow_mut()
            .push((command.to_string(), code.to_string()));

        match &self.result {
            Ok(stdout) => Ok(CapturedOutput {
                stdout: stdout.clone(),
            }),
            Err(stderr) => Err(ExecutionError::NonZeroExit {
                command: command.to_string(),
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }),
        }
    }
}
