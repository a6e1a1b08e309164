use super::StorageBackend;
use crate::error::{RepsError, Result};
use crate::model::{Delta, ItemStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const ITEMS_FILENAME: &str = "items.json";
pub const DELTAS_FILENAME: &str = "deltas.json";

/// Reads a JSON document. A missing or blank file is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RepsError::Io(e)),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(&content).map_err(RepsError::Serialization)?;
    Ok(Some(value))
}

/// Writes a JSON document atomically: a fresh temp file in the same
/// directory is written, flushed to disk, then renamed over `path`.
/// On failure the previous file is left as it was.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(RepsError::Io)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(RepsError::Serialization)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data");
    let tmp_path = dir.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));

    let written = write_and_sync(&tmp_path, content.as_bytes())
        .and_then(|_| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(RepsError::Io(e));
    }

    debug!(path = %path.display(), bytes = content.len(), "saved document");
    Ok(())
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// JSON files in a single data directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn items_path(&self) -> PathBuf {
        self.root.join(ITEMS_FILENAME)
    }

    pub fn deltas_path(&self) -> PathBuf {
        self.root.join(DELTAS_FILENAME)
    }
}

impl StorageBackend for FsBackend {
    fn load_store(&self) -> Result<Option<ItemStore>> {
        load_json(&self.items_path())
    }

    fn save_store(&self, store: &ItemStore) -> Result<()> {
        save_json(store, &self.items_path())
    }

    fn load_deltas(&self) -> Result<Vec<Delta>> {
        Ok(load_json(&self.deltas_path())?.unwrap_or_default())
    }

    fn save_deltas(&self, deltas: &[Delta]) -> Result<()> {
        save_json(deltas, &self.deltas_path())
    }
}
