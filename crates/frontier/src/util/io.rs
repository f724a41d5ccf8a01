//! I/O utility functions

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path used while writing: `results.csv` -> `results.csv.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("frontier"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes to a file atomically using the write-then-rename pattern.
///
/// A reader never observes a half-written results table or run file. Missing
/// parent directories are created.
pub fn atomic_write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp = temp_path(path);
    fs::write(&temp, content)?;
    fs::rename(&temp, path)
}

pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    atomic_write_bytes(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");

        atomic_write(&path, "Returns,Volatility\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Returns,Volatility\n");
        assert!(!dir.path().join("results.csv.tmp").exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.yaml");

        atomic_write(&path, "first").unwrap();
        atomic_write_bytes(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("table.csv");

        atomic_write(&path, "x").unwrap();
        assert!(path.exists());
    }
}
