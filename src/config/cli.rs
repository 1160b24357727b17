use crate::core::Storage;
use crate::utils::error::{CodeplugError, Result};
use std::fs;
use std::path::Path;

/// Filesystem storage. Paths are resolved against `base_path`; an empty base
/// uses them as given.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        fs::read(&full_path).map_err(|e| CodeplugError::input(full_path.to_string_lossy(), e))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let full_path = Path::new(&self.base_path).join(dir);
        let unreadable = |e| CodeplugError::input(full_path.to_string_lossy(), e);
        let mut names = Vec::new();
        for entry in fs::read_dir(&full_path).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            if !entry.file_type().map_err(unreadable)?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => tracing::debug!("skipping non UTF-8 file name {:?}", name),
            }
        }
        names.sort();
        Ok(names)
    }
}
