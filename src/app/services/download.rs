use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::app::infrastructure::error::Result;

/// File name for an exported document: title plus a filesystem-safe UTC timestamp.
pub fn download_filename(title: &str, at: DateTime<Utc>) -> String {
    let title = title.trim();
    let title = if title.is_empty() { "document" } else { title };
    let title: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}.pdf", title, stamp)
}

/// Receives finished export payloads.
pub trait DownloadSink: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves downloads into a directory.
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectoryDownloads {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(filename);
        let partial = self.dir.join(format!(".{}.part", filename));

        // Write beside the target and rename; a failed save leaves nothing behind.
        if let Err(e) = fs::write(&partial, bytes).and_then(|_| fs::rename(&partial, &target)) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        Ok(target)
    }
}
