// Archive staging
//
// Unpacks a zip archive into a uniquely named temporary directory. The
// directory lives exactly as long as the returned guard.

use crate::config::StagingConfig;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

/// An unpacked archive; dropping it removes the staged directory
#[derive(Debug)]
pub struct StagedArchive {
    dir: Option<TempDir>,
    root: std::path::PathBuf,
    files_extracted: usize,
}

impl StagedArchive {
    /// Root of the unpacked contents
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files_extracted(&self) -> usize {
        self.files_extracted
    }

    /// Remove the staged directory now, reporting failures
    pub fn close(mut self) -> Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close().map_err(Error::from),
            None => Ok(()),
        }
    }
}

impl Drop for StagedArchive {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                log::warn!("Failed to remove staged directory {}: {}", path.display(), e);
            }
        }
    }
}

/// Extract `archive` into a fresh staging directory.
///
/// Fails with [`Error::NotFound`] before touching the filesystem when the
/// archive is missing. Anything written before a later failure is removed
/// when the partially built guard is dropped.
pub fn stage_archive(archive: &Path, config: &StagingConfig) -> Result<StagedArchive> {
    if !archive.is_file() {
        return Err(Error::NotFound(archive.to_path_buf()));
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix(&config.prefix);
    let dir = match &config.temp_root {
        Some(parent) => builder.tempdir_in(parent)?,
        None => builder.tempdir()?,
    };

    let mut staged = StagedArchive {
        root: dir.path().to_path_buf(),
        dir: Some(dir),
        files_extracted: 0,
    };
    log::info!("Staging {} into {}", archive.display(), staged.root.display());

    staged.files_extracted = extract_zip(archive, &staged.root)?;
    log::info!("Extracted {} files from {}", staged.files_extracted, archive.display());

    Ok(staged)
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .map_err(|e| Error::extraction(archive_path, format!("failed to open archive: {e}")))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| Error::extraction(archive_path, format!("invalid or corrupt zip: {e}")))?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::extraction(archive_path, format!("failed to read entry {i}: {e}")))?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                log::warn!("Skipping unsafe archive entry: {}", entry.name());
                continue;
            }
        };
        let output_path = dest.join(&entry_path);

        let write_failed = |e: io::Error| {
            Error::extraction(
                archive_path,
                format!("failed to write {}: {e}", entry_path.display()),
            )
        };

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(write_failed)?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(write_failed)?;
            }
            let mut outfile = File::create(&output_path).map_err(write_failed)?;
            io::copy(&mut entry, &mut outfile).map_err(write_failed)?;
            count += 1;
        }
    }

    Ok(count)
}
