use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt, BufReader};

use super::{FileMetadata, FileStorage, StorageError, content_type_for, validate_filename};

/// Filesystem-based poster storage: one flat directory, files kept under their original names
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    base_path: PathBuf,
}

impl FilesystemStorage {
    /// Create a new filesystem storage instance
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a validated file name inside the base directory
    fn full_path(&self, filename: &str) -> Result<PathBuf, StorageError> {
        validate_filename(filename)?;
        Ok(self.base_path.join(filename))
    }
}

#[async_trait]
impl FileStorage for FilesystemStorage {
    async fn store<R>(&self, filename: &str, mut reader: R) -> Result<String, StorageError>
    where
        R: AsyncRead + Send + Unpin,
    {
        let file_path = self.full_path(filename)?;

        fs::create_dir_all(&self.base_path).await?;

        // create_new makes the existence check and the creation a single step
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&file_path).await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("Refusing to overwrite existing file: {}", file_path.display());
                return Err(StorageError::AlreadyExists { filename: filename.to_string() });
            }
            Err(e) => return Err(e.into()),
        };

        let written = async {
            tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&file_path).await;
            return Err(e.into());
        }

        tracing::info!("Stored poster at path: {}", file_path.display());
        Ok(filename.to_string())
    }

    async fn retrieve(
        &self,
        filename: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError> {
        let file_path = self.full_path(filename)?;

        match fs::File::open(&file_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::FileNotFound { filename: filename.to_string() })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, filename: &str) -> Result<bool, StorageError> {
        let file_path = self.full_path(filename)?;
        Ok(fs::try_exists(&file_path).await?)
    }

    async fn delete(&self, filename: &str) -> Result<bool, StorageError> {
        let file_path = self.full_path(filename)?;

        match fs::remove_file(&file_path).await {
            Ok(()) => {
                tracing::info!("Deleted poster at path: {}", file_path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Poster already absent: {}", file_path.display());
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn metadata(&self, filename: &str) -> Result<FileMetadata, StorageError> {
        let file_path = self.full_path(filename)?;

        let metadata = match fs::metadata(&file_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::FileNotFound { filename: filename.to_string() });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(FileMetadata {
            size: metadata.len(),
            content_type: content_type_for(filename),
            last_modified: metadata.modified().unwrap_or(std::time::SystemTime::UNIX_EPOCH),
        })
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await?;

        let metadata = fs::metadata(&self.base_path).await?;
        if !metadata.is_dir() {
            return Err(StorageError::IoError {
                message: format!("{} is not a directory", self.base_path.display()),
            });
        }

        Ok(())
    }
}
