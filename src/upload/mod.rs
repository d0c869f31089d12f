//! Image uploads for project and client records.
//!
//! Files land in `{upload_dir}/{collection}/` under a generated name and are
//! served back by the static `/uploads` route. Only one image field is accepted
//! per request; its size is enforced while streaming so an oversized body never
//! fully reaches disk.

pub mod form;

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::database::FormFields;

pub use form::ResourceForm;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file exceeds the {limit_bytes} byte limit")]
    FileTooLarge { limit_bytes: usize },

    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("unexpected file field: {0}")]
    UnexpectedField(String),

    #[error("malformed multipart body: {0}")]
    Multipart(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A file written to the upload directory during the current request.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub collection: &'static str,
    pub filename: String,
    pub path: PathBuf,
}

impl StoredImage {
    /// `{base}/uploads/{collection}/{filename}`
    pub fn public_url(&self, base: &str) -> String {
        format!(
            "{}/uploads/{}/{}",
            base.trim_end_matches('/'),
            self.collection,
            self.filename
        )
    }

    /// Remove the file again; used when the request fails after the upload.
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!("Failed to remove orphaned upload {}: {}", self.path.display(), e);
        }
    }
}

/// Text fields plus the optional stored image of one request.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: FormFields,
    pub image: Option<StoredImage>,
}

impl UploadForm {
    pub async fn discard_image(&mut self) {
        if let Some(image) = self.image.take() {
            image.discard().await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_file_size_bytes: usize,
}

impl UploadStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root: config.directory.clone(),
            max_file_size_bytes: config.max_file_size_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    /// Create the per-collection directories up front so static serving works
    /// before the first upload.
    pub async fn ensure_dirs(&self, collections: &[&str]) -> std::io::Result<()> {
        for collection in collections {
            tokio::fs::create_dir_all(self.root.join(collection)).await?;
        }
        Ok(())
    }

    /// Drain a multipart body: text parts become fields, the part named
    /// `image_field` is stored on disk. Any failure removes a file already
    /// written for this request.
    pub async fn read_multipart(
        &self,
        mut multipart: Multipart,
        collection: &'static str,
        image_field: &str,
    ) -> Result<UploadForm, UploadError> {
        let mut form = UploadForm::default();
        match self
            .collect_parts(&mut multipart, collection, image_field, &mut form)
            .await
        {
            Ok(()) => Ok(form),
            Err(err) => {
                form.discard_image().await;
                drain(&mut multipart).await;
                Err(err)
            }
        }
    }

    async fn collect_parts(
        &self,
        multipart: &mut Multipart,
        collection: &'static str,
        image_field: &str,
        form: &mut UploadForm,
    ) -> Result<(), UploadError> {
        while let Some(field) = multipart.next_field().await.map_err(|e| self.multipart_error(e))? {
            let name = field.name().unwrap_or_default().to_string();

            // only parts with a filename are files; a text part under the
            // image name (the current URL echoed back) is dropped
            if field.file_name().is_none() {
                let text = field.text().await.map_err(|e| self.multipart_error(e))?;
                if name != image_field {
                    form.fields.insert(name, text);
                }
                continue;
            }

            // exactly one file, and only under the expected name
            if name != image_field || form.image.is_some() {
                return Err(UploadError::UnexpectedField(name));
            }

            // browsers send an empty file part when nothing was chosen
            if field.file_name().is_some_and(str::is_empty) {
                continue;
            }

            form.image = Some(self.store(field, collection).await?);
        }
        Ok(())
    }

    async fn store(
        &self,
        mut field: Field<'_>,
        collection: &'static str,
    ) -> Result<StoredImage, UploadError> {
        let content_type = field.content_type().unwrap_or_default().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedType(content_type));
        }

        let dir = self.root.join(collection);
        tokio::fs::create_dir_all(&dir).await?;

        let (filename, path, mut file) = open_unique(&dir, field.file_name(), &content_type).await?;
        let stored = StoredImage {
            collection,
            filename,
            path,
        };

        match self.write_chunks(&mut field, &mut file).await {
            Ok(size) => {
                tracing::debug!(
                    "Stored upload {} ({} bytes, {})",
                    stored.path.display(),
                    size,
                    content_type
                );
                Ok(stored)
            }
            Err(err) => {
                drop(file);
                stored.discard().await;
                Err(err)
            }
        }
    }

    async fn write_chunks(
        &self,
        field: &mut Field<'_>,
        file: &mut tokio::fs::File,
    ) -> Result<usize, UploadError> {
        let mut size = 0usize;
        while let Some(chunk) = field.chunk().await.map_err(|e| self.multipart_error(e))? {
            size += chunk.len();
            if size > self.max_file_size_bytes {
                return Err(UploadError::FileTooLarge {
                    limit_bytes: self.max_file_size_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(size)
    }

    fn multipart_error(&self, err: MultipartError) -> UploadError {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::FileTooLarge {
                limit_bytes: self.max_file_size_bytes,
            }
        } else {
            UploadError::Multipart(err.body_text())
        }
    }
}

/// Read and drop whatever is left of a rejected body so the client gets to
/// see the error response instead of a reset connection.
async fn drain(multipart: &mut Multipart) {
    while let Ok(Some(mut field)) = multipart.next_field().await {
        while let Ok(Some(_)) = field.chunk().await {}
    }
}

/// Open a fresh file with a generated name, retrying on the (unlikely) clash.
async fn open_unique(
    dir: &Path,
    original: Option<&str>,
    content_type: &str,
) -> Result<(String, PathBuf, tokio::fs::File), UploadError> {
    let ext = extension_for(original, content_type);
    let mut attempts = 0;
    loop {
        let filename = generate_filename(&ext);
        let path = dir.join(&filename);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((filename, path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && attempts < 5 => {
                attempts += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// `{unix_millis}-{9 random digits}{ext}`
pub fn generate_filename(ext: &str) -> String {
    let suffix = Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("{}-{:09}{}", Utc::now().timestamp_millis(), suffix, ext)
}

/// Extension (with leading dot) from the client's filename, falling back to
/// the MIME type. Empty when neither gives a usable one.
pub fn extension_for(original: Option<&str>, content_type: &str) -> String {
    let from_name = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    if let Some(ext) = from_name {
        return format!(".{ext}");
    }

    let from_mime = match content_type {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        "image/bmp" => "bmp",
        _ => return String::new(),
    };
    format!(".{from_mime}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_prefers_original_name() {
        assert_eq!(extension_for(Some("Photo.JPEG"), "image/png"), ".jpeg");
        assert_eq!(extension_for(Some("no-extension"), "image/png"), ".png");
        assert_eq!(extension_for(None, "image/webp"), ".webp");
        assert_eq!(extension_for(Some("weird.p$g"), "image/x-unknown"), "");
    }

    #[test]
    fn generated_names_have_timestamp_and_suffix() {
        let name = generate_filename(".png");
        let (stamp, rest) = name.split_once('-').expect("dash separator");
        assert!(stamp.parse::<i64>().is_ok());
        assert_eq!(rest.len(), 9 + ".png".len());
        assert!(rest.ends_with(".png"));
        assert_ne!(generate_filename(".png"), generate_filename(".png"));
    }

    #[test]
    fn public_url_joins_base() {
        let image = StoredImage {
            collection: "clients",
            filename: "1-000000001.jpg".into(),
            path: PathBuf::from("uploads/clients/1-000000001.jpg"),
        };
        assert_eq!(
            image.public_url("http://localhost:5000/"),
            "http://localhost:5000/uploads/clients/1-000000001.jpg"
        );
    }

    #[tokio::test]
    async fn ensure_dirs_creates_collections() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(&UploadConfig {
            directory: tmp.path().to_path_buf(),
            max_file_size_bytes: 10,
        });
        store.ensure_dirs(&["projects", "clients"]).await.unwrap();
        assert!(tmp.path().join("projects").is_dir());
        assert!(tmp.path().join("clients").is_dir());
    }
}
