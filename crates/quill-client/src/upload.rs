//! Reading local files for upload.

use std::path::Path;

use crate::ClientError;

/// A local file read into memory, ready for `send_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// File name without directories, as shown to other participants.
    pub name: String,
    /// Whole file content.
    pub content: Vec<u8>,
}

impl FileUpload {
    /// Read the whole file at `path`, refusing files over `max_size` bytes
    /// before any content is loaded.
    ///
    /// # Errors
    ///
    /// - `ClientError::Upload` if the path has no file name or the name is not
    ///   valid UTF-8
    /// - `ClientError::UploadTooLarge` if the file is larger than `max_size`
    /// - `ClientError::Io` if the file cannot be read
    pub async fn read(path: impl AsRef<Path>, max_size: usize) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| ClientError::Upload(format!("no file name in {}", path.display())))?
            .to_str()
            .ok_or_else(|| ClientError::Upload(format!("file name is not UTF-8: {}", path.display())))?
            .to_owned();

        let len = tokio::fs::metadata(path).await?.len();
        let size = usize::try_from(len).unwrap_or(usize::MAX);
        if size > max_size {
            return Err(ClientError::UploadTooLarge { size, max: max_size });
        }

        let content = tokio::fs::read(path).await?;
        tracing::debug!(name = %name, size = content.len(), "read upload");

        Ok(Self { name, content })
    }

    /// Content size in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}
