use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for abstracting file system operations.
/// This trait enables dependency injection and testability.
#[async_trait]
pub trait FileSystemOperations: Send + Sync {
    /// Creates a directory at the specified path, including all parent directories.
    async fn create_dir(&self, path: &Path) -> Result<()>;

    /// Writes content to a file, creating parent directories if needed.
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Checks if a path exists (file or directory).
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Lists all entries in a directory.
    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Size of a file in bytes.
    async fn file_size(&self, path: &Path) -> Result<u64>;
}

/// Default implementation of FileSystemOperations using tokio::fs.
pub struct DefaultFileSystem;

#[async_trait]
impl FileSystemOperations for DefaultFileSystem {
    async fn create_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(path).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    async fn file_size(&self, path: &Path) -> Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DefaultFileSystem;
        let path = dir.path().join("nested").join("file.txt");

        fs.write_file(&path, "content").await.unwrap();
        assert!(fs.exists(&path).await.unwrap());
        assert_eq!(fs.file_size(&path).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_read_dir_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DefaultFileSystem;
        fs.write_file(&dir.path().join("b.txt"), "b").await.unwrap();
        fs.write_file(&dir.path().join("a.txt"), "a").await.unwrap();

        let entries = fs.read_dir(dir.path()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].ends_with("a.txt"));
        assert!(entries[1].ends_with("b.txt"));
    }

    #[tokio::test]
    async fn test_exists_false_for_missing() {
        let fs = DefaultFileSystem;
        assert!(!fs.exists(Path::new("/no/such/path")).await.unwrap());
    }
}
