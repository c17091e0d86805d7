//! Utility functions for error handling
//!
//! File-system helpers that attach the path and purpose to `io::Error`s.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

fn path_error(kind: io::ErrorKind, message: &str, path: &Path, purpose: &str) -> io::Error {
    io::Error::new(
        kind,
        format!("{message}: {} (needed for: {purpose})", path.display()),
    )
}

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(path_error(io::ErrorKind::NotFound, "File not found", path, purpose).into());
    }

    if !path.is_file() {
        return Err(
            path_error(io::ErrorKind::InvalidInput, "Path is not a file", path, purpose).into(),
        );
    }

    fs::File::open(path).map_err(|e| {
        let message = match e.kind() {
            io::ErrorKind::PermissionDenied => "Permission denied - check file permissions",
            _ => "Failed to open file",
        };
        path_error(e.kind(), message, path, purpose).into()
    })
}

/// Create a directory (and its parents) if it does not exist yet
pub fn ensure_directory(path: &Path, purpose: &str) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(path_error(
            io::ErrorKind::AlreadyExists,
            "Path exists but is not a directory",
            path,
            purpose,
        )
        .into());
    }

    fs::create_dir_all(path)
        .map_err(|e| path_error(e.kind(), "Failed to create directory", path, purpose).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn missing_file_reports_path_and_purpose() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("CNAE.csv");

        let err = safe_open_file(&missing, "classification lookup").unwrap_err();
        match err {
            AnalysisError::IoError(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                let message = e.to_string();
                assert!(message.contains("CNAE.csv"));
                assert!(message.contains("classification lookup"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ensure_directory_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("output").join("reports");

        ensure_directory(&nested, "report output").unwrap();
        assert!(nested.is_dir());

        // Second call on an existing directory is fine
        ensure_directory(&nested, "report output").unwrap();
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("output");
        fs::write(&file, b"not a dir").unwrap();

        assert!(ensure_directory(&file, "report output").is_err());
    }
}
