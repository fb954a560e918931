//! Multipart upload batches for property images and profile avatars.

use std::path::Path;

use tracing::{debug, warn};

use crate::api::FilePart;
use crate::error::{ClientError, Result};

const IMAGES_FIELD: &str = "images";
const AVATAR_FIELD: &str = "avatar";

/// Files queued for one upload request.
///
/// Only `image/*` files are accepted, matching the picker's `accept="image/*"` filter.
/// No size checks and no resumability.
#[derive(Debug, Clone)]
pub struct UploadBatch {
    field: &'static str,
    single: bool,
    files: Vec<FilePart>,
}

impl UploadBatch {
    /// Property gallery upload, any number of files under `images`.
    pub fn images() -> Self {
        Self {
            field: IMAGES_FIELD,
            single: false,
            files: Vec::new(),
        }
    }

    /// Profile picture, a single file under `avatar`. Adding another replaces it.
    pub fn avatar() -> Self {
        Self {
            field: AVATAR_FIELD,
            single: true,
            files: Vec::new(),
        }
    }

    /// Queues in-memory bytes. Returns `false` when the file is not an image.
    pub fn add_bytes(&mut self, file_name: &str, bytes: Vec<u8>) -> bool {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            warn!(file_name, mime = %mime, "skipping non-image file");
            return false;
        }

        if self.single {
            self.files.clear();
        }
        debug!(file_name, mime = %mime, size = bytes.len(), "queued file for upload");
        self.files.push(FilePart {
            field: self.field.to_string(),
            file_name: file_name.to_string(),
            mime: mime.essence_str().to_string(),
            bytes,
        });
        true
    }

    /// Reads a file from disk and queues it.
    pub async fn add_path(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::Validation(format!("{} is not a file", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ClientError::Validation(format!("{}: {err}", path.display())))?;
        Ok(self.add_bytes(&file_name, bytes))
    }

    pub fn remove(&mut self, index: usize) -> Option<FilePart> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|file| file.file_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The multipart parts; an empty batch is refused before any request is made.
    pub fn into_parts(self) -> Result<Vec<FilePart>> {
        if self.files.is_empty() {
            return Err(ClientError::Validation(
                "Please select at least one image".to_string(),
            ));
        }
        Ok(self.files)
    }
}
