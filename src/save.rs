//! "Save as" capability used by exports

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Destination for exported files
#[async_trait]
pub trait SaveAs: Send + Sync {
    /// Persist `bytes` under `file_name`, returning where they ended up.
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<PathBuf>;
}

/// Writes exports into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    /// Save into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SaveAs for DirectorySaver {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        if file_name.is_empty() || Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
            return Err(Error::Export(format!("Invalid export file name '{file_name}'")));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create directory {}: {e}", self.dir.display()),
            ))
        })?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {e}", path.display()),
            ))
        })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved export");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_into_nested_directory() {
        let dir = std::env::temp_dir()
            .join(format!("qrstudio-save-{}", std::process::id()))
            .join("nested");
        let saver = DirectorySaver::new(&dir);

        let path = saver.save("hello.svg", b"<svg/>".to_vec()).await.unwrap();
        assert_eq!(path, dir.join("hello.svg"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"<svg/>");

        let _ = tokio::fs::remove_dir_all(dir.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn refuses_path_components() {
        let saver = DirectorySaver::new(std::env::temp_dir());
        assert!(matches!(
            saver.save("../escape.png", Vec::new()).await,
            Err(Error::Export(_))
        ));
    }
}
