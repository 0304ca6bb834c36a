// Upload storage
//
// Persists uploaded archives in a configured directory and keeps an
// id -> path index in `uploads.json` beside them.

use crate::config::UploadConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "uploads.json";

/// A stored upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: u64,
    pub file_name: String,
    pub file_path: PathBuf,
    pub uploaded_at: DateTime<Utc>,
}

/// Directory-backed store of uploaded archives
#[derive(Debug)]
pub struct UploadStore {
    directory: PathBuf,
    records: Vec<UploadRecord>,
}

impl UploadStore {
    /// Open the store, creating its directory if needed
    pub fn open(config: &UploadConfig) -> Result<Self> {
        fs::create_dir_all(&config.directory)?;
        Self::load(config.directory.clone())
    }

    /// Open the store for lookups only; a missing directory reads as empty
    pub fn open_read_only(config: &UploadConfig) -> Result<Self> {
        Self::load(config.directory.clone())
    }

    fn load(directory: PathBuf) -> Result<Self> {
        let index = directory.join(INDEX_FILE);
        let records = if index.exists() {
            let contents = fs::read_to_string(&index)?;
            serde_json::from_str(&contents)?
        } else {
            Vec::new()
        };

        Ok(Self { directory, records })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Store `payload` under the base name of `file_name` and record it.
    ///
    /// A previous upload with the same name is overwritten on disk but
    /// keeps its own record.
    pub fn save(&mut self, file_name: &str, payload: &mut impl Read) -> Result<UploadRecord> {
        let base_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::invalid_upload(format!("unusable file name: {:?}", file_name)))?
            .to_string();

        let file_path = self.directory.join(&base_name);
        let mut out = File::create(&file_path)?;
        let bytes = io::copy(payload, &mut out)?;
        out.sync_all()?;

        let record = UploadRecord {
            id: self.next_id(),
            file_name: base_name,
            file_path,
            uploaded_at: Utc::now(),
        };
        self.records.push(record.clone());
        self.persist()?;

        log::info!(
            "Stored upload {} ({} bytes) as id {}",
            record.file_name,
            bytes,
            record.id
        );
        Ok(record)
    }

    /// Copy an existing file into the store
    pub fn save_file(&mut self, source: &Path) -> Result<UploadRecord> {
        if !source.is_file() {
            return Err(Error::NotFound(source.to_path_buf()));
        }
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut file = File::open(source)?;
        self.save(&name, &mut file)
    }

    pub fn get(&self, id: u64) -> Result<&UploadRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(Error::UploadNotFound(id))
    }

    pub fn list(&self) -> &[UploadRecord] {
        &self.records
    }

    fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(self.directory.join(INDEX_FILE), json)?;
        Ok(())
    }
}
