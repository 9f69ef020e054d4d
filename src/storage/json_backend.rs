use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{errors::Result, utils::paths};

use super::{StorageBackend, DEFAULT_STORAGE_KEY};

const SLOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores the slot as `<root>/<key>.json`, replacing it atomically on save.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    key: String,
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, key: Option<&str>) -> Result<Self> {
        let root = root.unwrap_or_else(paths::app_data_dir);
        paths::ensure_dir(&root)?;
        let key = key.unwrap_or(DEFAULT_STORAGE_KEY).to_string();
        let path = root.join(format!("{}.{}", canonical_name(&key), SLOT_EXTENSION));
        Ok(Self { key, path })
    }

    pub fn slot_path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonStorage {
    fn key(&self) -> &str {
        &self.key
    }

    fn read_slot(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_slot(&self, data: &str) -> Result<()> {
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = data.len(), "slot written");
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        DEFAULT_STORAGE_KEY.into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
