//! Rotation of the active log file

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Timestamp;

use crate::logger::compression;
use crate::logger::config::{RotationConfig, RotationStrategy, TimeUnit};
use crate::logger::error::LoggerError;

/// Decides when the active file rotates and prunes old rotations
pub struct RotationManager {
    config: RotationConfig,
    last_rotation: Timestamp,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            last_rotation: Timestamp::now(),
        }
    }

    pub fn should_rotate(&self, current_size: u64) -> bool {
        self.should_rotate_at(current_size, Timestamp::now())
    }

    fn should_rotate_at(&self, current_size: u64, now: Timestamp) -> bool {
        let size_exceeded = current_size >= self.config.max_size;
        match self.config.strategy {
            RotationStrategy::Size => size_exceeded,
            RotationStrategy::Time(unit) => self.period_elapsed(unit, now),
            RotationStrategy::Count => false,
            RotationStrategy::Combined => size_exceeded || self.period_elapsed(TimeUnit::Daily, now),
        }
    }

    fn period_elapsed(&self, unit: TimeUnit, now: Timestamp) -> bool {
        now.duration_since(self.last_rotation) >= unit.duration_from(self.last_rotation)
    }

    /// Move `current` aside under a timestamped name, compress it if
    /// configured, then drop rotations beyond `max_files`.
    ///
    /// Returns the final path of the rotated file, if there was one.
    pub fn rotate(&mut self, current: &Path) -> Result<Option<PathBuf>, LoggerError> {
        let mut rotated = None;

        if current.exists() {
            let target = rotated_path(current, Timestamp::now());
            fs::rename(current, &target)?;
            let target = if self.config.compress {
                compression::compress_file(&target)?
            } else {
                target
            };
            rotated = Some(target);
        }

        self.last_rotation = Timestamp::now();
        self.prune(current, self.config.max_files)?;

        Ok(rotated)
    }

    /// Keep only half of the usual rotations; used when the disk is full.
    pub fn force_cleanup(&self, current: &Path) -> Result<(), LoggerError> {
        self.prune(current, (self.config.max_files / 2).max(1))
    }

    fn prune(&self, current: &Path, keep: usize) -> Result<(), LoggerError> {
        let mut rotated = rotated_siblings(current)?;
        if rotated.len() <= keep {
            return Ok(());
        }

        // Oldest first
        rotated.sort_by_key(|path| fs::metadata(path).and_then(|m| m.modified()).ok());
        let excess = rotated.len() - keep;
        for path in rotated.into_iter().take(excess) {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// `logs/app.log` rotated at 2025-01-02 03:04:05 UTC becomes
/// `logs/app.20250102_030405.log`. A numeric suffix is added when a rotation
/// with the same second already exists.
fn rotated_path(current: &Path, at: Timestamp) -> PathBuf {
    let stamp = at.strftime("%Y%m%d_%H%M%S").to_string();
    let stem = current.file_stem().unwrap_or_default().to_string_lossy();
    let ext = current.extension().map(|e| e.to_string_lossy());

    let name_for = |suffix: Option<u32>| {
        let stamp = match suffix {
            Some(n) => format!("{}-{}", stamp, n),
            None => stamp.clone(),
        };
        match &ext {
            Some(ext) => format!("{}.{}.{}", stem, stamp, ext),
            None => format!("{}.{}", stem, stamp),
        }
    };

    let mut candidate = current.with_file_name(name_for(None));
    let mut n = 1;
    while candidate.exists() || compression::compressed_path(&candidate).exists() {
        candidate = current.with_file_name(name_for(Some(n)));
        n += 1;
    }
    candidate
}

/// Files next to `current` whose name starts with `<stem>.`, excluding it.
fn rotated_siblings(current: &Path) -> Result<Vec<PathBuf>, LoggerError> {
    let parent = match current.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = format!(
        "{}.",
        current.file_stem().unwrap_or_default().to_string_lossy()
    );
    let current_name = current.file_name();

    let files = fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| {
            let name = entry.file_name();
            Some(name.as_os_str()) != current_name
                && name.to_string_lossy().starts_with(&prefix)
        })
        .map(|entry| entry.path())
        .collect();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use jiff::SignedDuration;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn config(strategy: RotationStrategy, max_size: u64, max_files: usize) -> RotationConfig {
        RotationConfig {
            strategy,
            max_size,
            max_files,
            compress: false,
        }
    }

    fn count_rotated(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                name.starts_with("chat.") && name != "chat.log"
            })
            .count()
    }

    #[test]
    fn test_time_rotation_after_period() {
        let manager = RotationManager::new(config(RotationStrategy::Time(TimeUnit::Hourly), 1024, 5));
        let start = manager.last_rotation;

        assert!(!manager.should_rotate_at(0, start + SignedDuration::from_mins(59)));
        assert!(manager.should_rotate_at(0, start + SignedDuration::from_mins(60)));
    }

    #[test]
    fn test_combined_rotates_daily_or_by_size() {
        let manager = RotationManager::new(config(RotationStrategy::Combined, 1024, 5));
        let start = manager.last_rotation;

        assert!(!manager.should_rotate_at(10, start));
        assert!(manager.should_rotate_at(1024, start));
        assert!(manager.should_rotate_at(10, start + SignedDuration::from_hours(24)));
    }

    #[test]
    fn test_count_strategy_never_rotates_on_write() {
        let manager = RotationManager::new(config(RotationStrategy::Count, 1, 5));
        assert!(!manager.should_rotate(u64::MAX));
    }

    #[test]
    fn test_rotated_path_format() {
        let at: Timestamp = "2025-01-02T03:04:05Z".parse().unwrap();
        let dir = tempdir().unwrap();
        let current = dir.path().join("chat.log");

        assert_eq!(
            rotated_path(&current, at),
            dir.path().join("chat.20250102_030405.log")
        );

        fs::write(dir.path().join("chat.20250102_030405.log"), "taken").unwrap();
        assert_eq!(
            rotated_path(&current, at),
            dir.path().join("chat.20250102_030405-1.log")
        );
    }

    #[test]
    fn test_rotate_moves_file_and_compresses() {
        let dir = tempdir().unwrap();
        let current = dir.path().join("chat.log");
        fs::write(&current, "payload").unwrap();

        let mut rotation = config(RotationStrategy::Size, 10, 3);
        rotation.compress = true;
        let mut manager = RotationManager::new(rotation);

        let rotated = manager.rotate(&current).unwrap().unwrap();
        assert!(!current.exists());
        assert!(rotated.to_string_lossy().ends_with(".log.gz"));
        assert!(rotated.exists());
    }

    #[test]
    fn test_rotate_without_active_file() {
        let dir = tempdir().unwrap();
        let mut manager = RotationManager::new(config(RotationStrategy::Size, 10, 3));
        assert!(manager.rotate(&dir.path().join("chat.log")).unwrap().is_none());
    }

    #[test]
    fn test_prune_ignores_unrelated_files() {
        let dir = tempdir().unwrap();
        let current = dir.path().join("chat.log");
        fs::write(&current, "active").unwrap();
        fs::write(dir.path().join("chatter.log"), "other").unwrap();
        fs::write(dir.path().join("chat.20250101_000000.log"), "old").unwrap();

        let manager = RotationManager::new(config(RotationStrategy::Size, 10, 1));
        manager.force_cleanup(&current).unwrap();

        assert!(current.exists());
        assert!(dir.path().join("chatter.log").exists());
        assert!(dir.path().join("chat.20250101_000000.log").exists());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_size_rotation_threshold(
            current_size in 0u64..10_000_000u64,
            max_size in 1u64..10_000_000u64,
        ) {
            let manager = RotationManager::new(config(RotationStrategy::Size, max_size, 5));
            prop_assert_eq!(manager.should_rotate(current_size), current_size >= max_size);
        }

        /// After a rotation at most `max_files` rotated files remain and the
        /// oldest ones are the ones removed.
        #[test]
        fn prop_rotation_keeps_newest_files(
            max_files in 1usize..8usize,
            existing in 0usize..12usize,
        ) {
            let dir = tempdir().unwrap();
            let current = dir.path().join("chat.log");
            let base = FileTime::now().unix_seconds();

            for i in 0..existing {
                let path = dir.path().join(format!("chat.2020010{}_{:06}.log", i % 10, i));
                fs::write(&path, format!("old {}", i)).unwrap();
                let mtime = FileTime::from_unix_time(base - ((existing - i) as i64) * 60, 0);
                filetime::set_file_mtime(&path, mtime).unwrap();
            }
            fs::write(&current, "current").unwrap();

            let mut manager = RotationManager::new(config(RotationStrategy::Size, 1, max_files));
            let rotated = manager.rotate(&current).unwrap();

            prop_assert_eq!(count_rotated(dir.path()), (existing + 1).min(max_files));
            // The rotation just produced is the newest and always survives.
            prop_assert!(rotated.unwrap().exists());
        }
    }
}
