//! Gzip compression of rotated log files

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::logger::error::LoggerError;

/// Path of the compressed sibling: `app.20250101_000000.log` becomes
/// `app.20250101_000000.log.gz`.
pub fn compressed_path(file_path: &Path) -> PathBuf {
    let mut name = file_path.file_name().unwrap_or_default().to_os_string();
    name.push(".gz");
    file_path.with_file_name(name)
}

/// Gzip `file_path` next to itself and remove the original.
///
/// Returns the path of the compressed file. On failure the original file is
/// left in place and any partial `.gz` output is removed.
pub fn compress_file(file_path: &Path) -> Result<PathBuf, LoggerError> {
    let target = compressed_path(file_path);

    let result = (|| -> io::Result<()> {
        let mut input = BufReader::new(File::open(file_path)?);
        let mut encoder = GzEncoder::new(File::create(&target)?, Compression::default());
        io::copy(&mut input, &mut encoder)?;
        encoder.finish()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&target);
        return Err(LoggerError::Io(e));
    }

    fs::remove_file(file_path)?;
    Ok(target)
}
