use async_trait::async_trait;
use tokio::io::AsyncRead;

mod filesystem_storage;
pub mod utils;

pub use filesystem_storage::FilesystemStorage;
pub use utils::*;

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {filename}")]
    FileNotFound { filename: String },

    #[error("File already exists: {filename}")]
    AlreadyExists { filename: String },

    #[error("Invalid file name: {filename}")]
    InvalidFilename { filename: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::IoError { message: error.to_string() }
    }
}

/// Trait for poster file storage, keyed by plain file name
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store a new file under `filename`, returning the stored name.
    ///
    /// Fails with [`StorageError::AlreadyExists`] if the name is taken.
    async fn store<R>(&self, filename: &str, reader: R) -> Result<String, StorageError>
    where
        R: AsyncRead + Send + Unpin;

    /// Open a stored file for reading
    async fn retrieve(
        &self,
        filename: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError>;

    /// Check if a file exists
    async fn exists(&self, filename: &str) -> Result<bool, StorageError>;

    /// Delete a file. Returns `false` if there was nothing to delete.
    async fn delete(&self, filename: &str) -> Result<bool, StorageError>;

    /// Get metadata about a stored file
    async fn metadata(&self, filename: &str) -> Result<FileMetadata, StorageError>;

    /// Verify the storage location is usable
    async fn health_check(&self) -> Result<(), StorageError>;
}

/// File metadata information
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub content_type: &'static str,
    pub last_modified: std::time::SystemTime,
}
