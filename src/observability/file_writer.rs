//! Append-only trace file with size-based rotation.
//!
//! When the active file grows past the limit it becomes `<file>.1`, the
//! previous `<file>.1` becomes `<file>.2`, and so on; the oldest backup beyond
//! the retention count is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Rotate once the active file exceeds 10 MiB.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Backups kept next to the active file.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe line writer. The file is opened lazily on the first write.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            backups,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline, rotating first if the file is too big.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from rotating, opening or writing the file.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        let oversized = fs::metadata(&self.file_path).is_ok_and(|m| m.len() > self.max_bytes);
        if oversized {
            *guard = None;
            self.rotate()?;
        }

        let file = match guard.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?,
        };
        let file = guard.insert(file);
        writeln!(file, "{line}")?;
        file.flush()
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return remove_if_exists(&self.file_path);
        }
        remove_if_exists(&self.backup_path(self.backups))?;
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.file_path, self.backup_path(1))
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("traces.json");
        let writer = FileWriter::new(path.clone());

        writer.write_line("{\"a\":1}").unwrap();
        writer.write_line("{\"b\":2}").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn rotates_and_keeps_bounded_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("traces.json");
        let writer = FileWriter::with_limits(path.clone(), 4, 2);

        for line in ["first", "second", "third", "fourth"] {
            writer.write_line(line).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "fourth\n");
        assert_eq!(fs::read_to_string(writer.backup_path(1)).unwrap(), "third\n");
        assert_eq!(fs::read_to_string(writer.backup_path(2)).unwrap(), "second\n");
        assert!(!writer.backup_path(3).exists());
    }
}
