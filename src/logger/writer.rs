//! Rotating file writer plugged into `tracing_subscriber::fmt`

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;
use crate::logger::rotation::RotationManager;

/// Shared handle to the active log file.
///
/// Each event gets a short-lived [`RotatingWriterGuard`] that checks for
/// rotation before writing. When the file cannot be written (and freeing
/// space does not help) output falls back to stderr for the rest of the
/// process lifetime.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
}

struct WriterState {
    file: BufWriter<File>,
    current_size: u64,
    rotation: RotationManager,
    fallback: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = if config.append {
            std::fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file,
                current_size,
                rotation: RotationManager::new(config.rotation.clone()),
                fallback: false,
            })),
            path: config.path.clone(),
        })
    }

    /// Whether writes currently go to stderr instead of the file
    pub fn is_in_fallback_mode(&self) -> bool {
        self.state.lock().map(|s| s.fallback).unwrap_or(true)
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard {
            state: Arc::clone(&self.state),
            path: self.path.clone(),
        }
    }
}

pub struct RotatingWriterGuard {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
}

impl RotatingWriterGuard {
    fn lock(&self) -> io::Result<MutexGuard<'_, WriterState>> {
        self.state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))
    }
}

impl Write for RotatingWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let path = self.path.clone();
        let mut state = self.lock()?;

        if state.fallback {
            return io::stderr().write(buf);
        }

        if state.rotation.should_rotate(state.current_size) {
            if let Err(e) = rotate(&mut state, &path) {
                return fall_back(&mut state, buf, &e);
            }
        }

        match state.file.write(buf) {
            Ok(written) => {
                state.current_size += written as u64;
                Ok(written)
            }
            Err(e) if is_disk_full(&e) => retry_after_cleanup(&mut state, &path, buf, e),
            Err(e) => fall_back(&mut state, buf, &e),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.lock()?;
        if state.fallback {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

impl Drop for RotatingWriterGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.file.flush();
        }
    }
}

fn rotate(state: &mut WriterState, path: &Path) -> io::Result<()> {
    state.file.flush()?;
    state
        .rotation
        .rotate(path)
        .map_err(|e| io::Error::other(e.to_string()))?;
    state.file = open_log_file(path, false)?;
    state.current_size = 0;
    Ok(())
}

fn retry_after_cleanup(
    state: &mut WriterState,
    path: &Path,
    buf: &[u8],
    error: io::Error,
) -> io::Result<usize> {
    if state.rotation.force_cleanup(path).is_ok() {
        if let Ok(written) = state.file.write(buf) {
            state.current_size += written as u64;
            return Ok(written);
        }
    }
    fall_back(state, buf, &error)
}

fn fall_back(state: &mut WriterState, buf: &[u8], error: &io::Error) -> io::Result<usize> {
    state.fallback = true;
    eprintln!("[logger] file write failed, falling back to stderr: {}", error);
    io::stderr().write(buf)
}

#[cfg(unix)]
fn is_disk_full(error: &io::Error) -> bool {
    // ENOSPC, EDQUOT
    matches!(error.raw_os_error(), Some(28) | Some(122))
        || error.kind() == io::ErrorKind::StorageFull
}

#[cfg(not(unix))]
fn is_disk_full(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::StorageFull
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::{LogFormat, RotationConfig, RotationStrategy};
    use std::fs;
    use tempfile::tempdir;

    fn file_config(path: PathBuf, append: bool, max_size: u64) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append,
            format: LogFormat::Json,
            rotation: RotationConfig {
                strategy: RotationStrategy::Size,
                max_size,
                max_files: 3,
                compress: false,
            },
        }
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("chat.log");

        let writer = RotatingFileWriter::new(&file_config(path.clone(), true, 1024)).unwrap();
        {
            let mut guard = writer.make_writer();
            guard.write_all(b"hello\n").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        assert!(!writer.is_in_fallback_mode());
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.log");
        fs::write(&path, "before\n").unwrap();

        let writer = RotatingFileWriter::new(&file_config(path.clone(), true, 1024)).unwrap();
        writer.make_writer().write_all(b"after\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "before\nafter\n");
    }

    #[test]
    fn test_truncate_when_not_appending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.log");
        fs::write(&path, "stale\n").unwrap();

        let writer = RotatingFileWriter::new(&file_config(path.clone(), false, 1024)).unwrap();
        writer.make_writer().write_all(b"fresh\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_rotates_when_size_reached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.log");

        let writer = RotatingFileWriter::new(&file_config(path.clone(), true, 8)).unwrap();
        writer.make_writer().write_all(b"0123456789\n").unwrap();
        writer.make_writer().write_all(b"next\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "next\n");
        let rotated: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "chat.log")
            .collect();
        assert_eq!(rotated.len(), 1);
        assert_eq!(
            fs::read_to_string(rotated[0].path()).unwrap(),
            "0123456789\n"
        );
    }
}
