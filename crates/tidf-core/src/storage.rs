//! Local file lifecycle for one download.
//!
//! The body goes to `<final>.part`, which is created lazily on the first
//! write. `commit` syncs and atomically renames it over the final path; if
//! the `PendingFile` is dropped without committing, the temp file is removed
//! and whatever was at the final path stays untouched.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// `file.gz` → `file.gz.part`
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

pub struct PendingFile {
    final_path: PathBuf,
    temp_path: PathBuf,
    file: Option<File>,
    written: u64,
    committed: bool,
}

impl PendingFile {
    /// Does not touch the filesystem.
    pub fn new(final_path: &Path) -> Self {
        Self {
            final_path: final_path.to_path_buf(),
            temp_path: temp_path(final_path),
            file: None,
            written: 0,
            committed: false,
        }
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Appends `data`, creating (or truncating a stale) temp file on first use.
    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if self.file.is_none() {
            self.file = Some(File::create(&self.temp_path)?);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(data)?;
            self.written += data.len() as u64;
        }
        Ok(())
    }

    /// Syncs the temp file and renames it to the final path. Returns bytes written.
    /// An empty body still produces an empty final file.
    pub fn commit(mut self) -> io::Result<u64> {
        let file = match self.file.take() {
            Some(f) => f,
            None => File::create(&self.temp_path)?,
        };
        file.sync_all()?;
        drop(file);
        std::fs::rename(&self.temp_path, &self.final_path)?;
        self.committed = true;
        Ok(self.written)
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.file.take();
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => tracing::debug!("removed partial file {}", self.temp_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "could not remove partial file {}: {}",
                self.temp_path.display(),
                e
            ),
        }
    }
}
