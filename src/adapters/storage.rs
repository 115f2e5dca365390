use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    /// Writes (overwrites) `path` under the base directory and returns the full path.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        Ok(full_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_file_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("out").display().to_string());

        storage.write_file("summary_by_inn.txt", b"old content\n").await.unwrap();
        let written = storage.write_file("summary_by_inn.txt", b"new\n").await.unwrap();

        assert!(written.ends_with("summary_by_inn.txt"));
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "new\n");
    }
}
