use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

const EXPORT_PREFIX: &str = "converted";
const EXPORT_EXTENSION: &str = ".csv";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to scan {dir} for ledger exports: {source}")]
    Io {
        dir: String,
        source: std::io::Error,
    },
    #[error("no converted*.csv ledger exports found in {dir}")]
    NoExports { dir: String },
}

/// Newest `converted*.csv` file in `dir`, by modification time.
pub fn latest_export<P: AsRef<Path>>(dir: P) -> Result<PathBuf, SourceError> {
    let dir = dir.as_ref();
    let io_error = |source| SourceError::Io {
        dir: dir.display().to_string(),
        source,
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.starts_with(EXPORT_PREFIX) || !name.ends_with(EXPORT_EXTENSION) {
            continue;
        }

        let metadata = entry.metadata().map_err(io_error)?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().map_err(io_error)?;
        debug!(file = name, "found ledger export candidate");

        let is_newer = newest
            .as_ref()
            .map_or(true, |(current, _)| modified > *current);
        if is_newer {
            newest = Some((modified, entry.path()));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| SourceError::NoExports {
            dir: dir.display().to_string(),
        })
}
