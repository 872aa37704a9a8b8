//! Incremental reader for the command file

use anyhow::{Context, Result};
use std::fs::{File, Metadata};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Result of reading whatever was appended since the last read
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// New text, with the file's modification time
    Data { text: String, modified: SystemTime },
    /// Nothing new
    Idle,
    /// The file is gone, shrank, or was replaced; the handle must be reopened
    Rotated,
}

/// Open handle on the command file plus the read position
#[derive(Debug)]
pub struct CommandFileTail {
    path: PathBuf,
    file: File,
    position: u64,
    identity: Option<u64>,
    /// Modification time when `position` was last advanced
    modified: Option<SystemTime>,
    /// Byte at `position - 1`, used to spot in-place rewrites
    last_byte: Option<u8>,
    /// Trailing bytes of a UTF-8 sequence split across writes
    pending: Vec<u8>,
}

impl CommandFileTail {
    /// Open the file; the first read returns its whole content
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open command file: {}", path.display()))?;
        let metadata = file.metadata().context("Failed to stat command file")?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            position: 0,
            identity: file_identity(&metadata),
            modified: metadata.modified().ok(),
            last_byte: None,
            pending: Vec::new(),
        })
    }

    /// Read only the bytes appended since the previous call
    ///
    /// A file that was deleted, replaced, shrunk, or rewritten in place
    /// (same length with a newer mtime, or different content before the
    /// read position) is reported as `Rotated` so it gets re-read in full.
    pub fn read_available(&mut self) -> Result<ReadOutcome> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ReadOutcome::Rotated),
            Err(e) => return Err(e).context("Failed to stat command file"),
        };
        let len = metadata.len();
        let modified = metadata.modified().ok();

        if file_identity(&metadata) != self.identity || len < self.position {
            return Ok(ReadOutcome::Rotated);
        }
        if len == self.position {
            if self.position > 0 && modified != self.modified {
                return Ok(ReadOutcome::Rotated);
            }
            return Ok(ReadOutcome::Idle);
        }
        if self.overwritten()? {
            return Ok(ReadOutcome::Rotated);
        }

        self.file
            .seek(SeekFrom::Start(self.position))
            .context("Failed to seek command file")?;
        let mut bytes = std::mem::take(&mut self.pending);
        let start = bytes.len();
        // Stop at the stat'ed length so position and mtime describe the same state
        let read = (&mut self.file)
            .take(len - self.position)
            .read_to_end(&mut bytes)
            .context("Failed to read command file")?;
        self.position += read as u64;
        self.modified = modified;
        if read > 0 {
            self.last_byte = bytes.get(start + read - 1).copied();
        }

        let (text, pending) = decode_utf8(bytes);
        self.pending = pending;
        if text.is_empty() {
            return Ok(ReadOutcome::Idle);
        }

        let modified = metadata
            .modified()
            .context("Failed to read command file modification time")?;
        Ok(ReadOutcome::Data { text, modified })
    }

    /// Whether the byte before the read position changed since it was read
    fn overwritten(&mut self) -> Result<bool> {
        let Some(expected) = self.last_byte else {
            return Ok(false);
        };
        self.file
            .seek(SeekFrom::Start(self.position - 1))
            .context("Failed to seek command file")?;
        let mut byte = [0u8; 1];
        self.file
            .read_exact(&mut byte)
            .context("Failed to read command file")?;
        Ok(byte[0] != expected)
    }
}

#[cfg(unix)]
fn file_identity(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.ino())
}

#[cfg(not(unix))]
fn file_identity(_metadata: &Metadata) -> Option<u64> {
    None
}

/// Decode UTF-8, holding back an incomplete trailing sequence
fn decode_utf8(bytes: Vec<u8>) -> (String, Vec<u8>) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, Vec::new()),
        Err(e) => {
            let error = e.utf8_error();
            let mut bytes = e.into_bytes();
            if error.error_len().is_none() {
                let pending = bytes.split_off(error.valid_up_to());
                (String::from_utf8_lossy(&bytes).into_owned(), pending)
            } else {
                (String::from_utf8_lossy(&bytes).into_owned(), Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::tempdir;

    fn append(path: &Path, bytes: &[u8]) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(bytes).unwrap();
    }

    fn text_of(outcome: ReadOutcome) -> String {
        match outcome {
            ReadOutcome::Data { text, .. } => text,
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn test_first_read_returns_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "title: One\n").unwrap();

        let mut tail = CommandFileTail::open(&path).unwrap();
        assert_eq!(text_of(tail.read_available().unwrap()), "title: One\n");
        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Idle);
    }

    #[test]
    fn test_reads_only_appended_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "title: One\n").unwrap();

        let mut tail = CommandFileTail::open(&path).unwrap();
        tail.read_available().unwrap();

        append(&path, b"progress: 10\nprogress: 20\n");
        assert_eq!(
            text_of(tail.read_available().unwrap()),
            "progress: 10\nprogress: 20\n"
        );
    }

    #[test]
    fn test_split_utf8_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "").unwrap();
        let mut tail = CommandFileTail::open(&path).unwrap();

        let line = "title: café\n".as_bytes();
        let split = line.len() - 2; // inside the two-byte é
        append(&path, &line[..split]);
        assert_eq!(text_of(tail.read_available().unwrap()), "title: caf");

        append(&path, &line[split..]);
        assert_eq!(text_of(tail.read_available().unwrap()), "é\n");
    }

    #[test]
    fn test_truncation_is_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "title: One\nwidth: 500\n").unwrap();

        let mut tail = CommandFileTail::open(&path).unwrap();
        tail.read_available().unwrap();

        std::fs::write(&path, "x\n").unwrap();
        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Rotated);
    }

    #[test]
    fn test_same_length_rewrite_is_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "title: AAA\n").unwrap();

        let mut tail = CommandFileTail::open(&path).unwrap();
        tail.read_available().unwrap();

        // let the mtime move past the first write's timestamp tick
        std::thread::sleep(Duration::from_millis(50));
        std::fs::write(&path, "title: BBB\n").unwrap();
        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Rotated);

        let mut reopened = CommandFileTail::open(&path).unwrap();
        assert_eq!(text_of(reopened.read_available().unwrap()), "title: BBB\n");
    }

    #[test]
    fn test_longer_rewrite_is_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "title: One\n").unwrap();

        let mut tail = CommandFileTail::open(&path).unwrap();
        tail.read_available().unwrap();

        std::fs::write(&path, "message: a longer line\n").unwrap();
        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Rotated);
    }

    #[test]
    fn test_idle_without_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "title: One\n").unwrap();

        let mut tail = CommandFileTail::open(&path).unwrap();
        tail.read_available().unwrap();
        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Idle);
        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Idle);
    }

    #[test]
    fn test_deleted_file_is_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "").unwrap();

        let mut tail = CommandFileTail::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Rotated);
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_file_is_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dialog.log");
        std::fs::write(&path, "").unwrap();
        let mut tail = CommandFileTail::open(&path).unwrap();

        let replacement = dir.path().join("replacement.log");
        std::fs::write(&replacement, "title: New\n").unwrap();
        std::fs::rename(&replacement, &path).unwrap();

        assert_eq!(tail.read_available().unwrap(), ReadOutcome::Rotated);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(CommandFileTail::open(&dir.path().join("missing.log")).is_err());
    }
}
