//! Picture storage for company logos and profile pictures.
//!
//! Files live under `{root}/{folder}/{stem}.{ext}` and are served back
//! through `/api/pictures/{folder}/{file}`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use gamestore_core::service::{Result, ServiceError};
use gamestore_core::store::{is_safe_path_segment, picture_extension, picture_stem};

/// Folder for company logos.
pub const COMPANY_PICTURES: &str = "company-pictures";

/// Folder for user profile pictures.
pub const USER_PICTURES: &str = "user-profile-pictures";

/// Public prefix of every picture link.
pub const LINK_PREFIX: &str = "/api/pictures/";

/// An uploaded file as received from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PictureUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Storage for pictures referenced by entities.
#[async_trait]
pub trait PictureStore: Send + Sync {
    /// Stores `picture` as `{folder}/{owner_id}-{name}` and returns its link.
    ///
    /// Returns `None` when there is nothing to store. An existing file of
    /// the same owner and name is replaced.
    async fn upload(
        &self,
        picture: Option<&PictureUpload>,
        folder: &str,
        owner_id: i64,
        name: &str,
    ) -> Result<Option<String>>;

    /// Removes the file behind `link`. A missing file is not an error.
    async fn delete(&self, link: &str) -> Result<()>;

    /// Reads a stored file, or `None` if it does not exist.
    async fn read(&self, folder: &str, file: &str) -> Result<Option<Vec<u8>>>;
}

/// Builds the public link for a stored file.
pub fn picture_link(folder: &str, file: &str) -> String {
    format!("{LINK_PREFIX}{folder}/{file}")
}

/// Splits a picture link into its folder and file name.
pub fn parse_picture_link(link: &str) -> Option<(&str, &str)> {
    let (folder, file) = link.strip_prefix(LINK_PREFIX)?.split_once('/')?;
    (is_safe_path_segment(folder) && is_safe_path_segment(file)).then_some((folder, file))
}

fn io_error(err: std::io::Error) -> ServiceError {
    ServiceError::Picture(err.to_string())
}

/// Picture store on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsPictureStore {
    root: PathBuf,
}

impl FsPictureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_path(&self, folder: &str, file: &str) -> Option<PathBuf> {
        (is_safe_path_segment(folder) && is_safe_path_segment(file))
            .then(|| self.root.join(folder).join(file))
    }
}

#[async_trait]
impl PictureStore for FsPictureStore {
    async fn upload(
        &self,
        picture: Option<&PictureUpload>,
        folder: &str,
        owner_id: i64,
        name: &str,
    ) -> Result<Option<String>> {
        let Some(picture) = picture.filter(|p| !p.bytes.is_empty()) else {
            return Ok(None);
        };

        let ext = picture_extension(&picture.file_name)?;
        let file = format!("{}.{ext}", picture_stem(owner_id, name));
        let path = self
            .file_path(folder, &file)
            .ok_or_else(|| ServiceError::Picture(format!("invalid picture folder '{folder}'")))?;

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await.map_err(io_error)?;

        // Readers never see a half-written file.
        let staging = dir.join(format!("{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&staging, &picture.bytes)
            .await
            .map_err(io_error)?;
        if let Err(err) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(io_error(err));
        }

        tracing::debug!(folder, file = %file, size = picture.bytes.len(), "Picture stored");
        Ok(Some(picture_link(folder, &file)))
    }

    async fn delete(&self, link: &str) -> Result<()> {
        let Some((folder, file)) = parse_picture_link(link) else {
            tracing::warn!(link, "Ignoring delete of unrecognized picture link");
            return Ok(());
        };
        let Some(path) = self.file_path(folder, file) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(link, "Picture deleted");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(err)),
        }
    }

    async fn read(&self, folder: &str, file: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.file_path(folder, file) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(err)),
        }
    }
}
