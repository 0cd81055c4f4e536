use serde::Serialize;
use std::collections::HashSet;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::backend::Backend;
use crate::error::{AppError, AppResult};

/// A file picked by the operator
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Extension after the last dot. `bin` when there is none or it is not
    /// plain alphanumeric, so it can go into a storage path as is.
    pub fn extension(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
                ext
            }
            _ => "bin",
        }
    }

    pub fn content_type(&self) -> String {
        if let Some(content_type) = &self.content_type {
            return content_type.clone();
        }
        let guessed = match self.extension().to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            "pdf" => "application/pdf",
            _ => "application/octet-stream",
        };
        guessed.to_string()
    }
}

/// Where an uploaded file ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StoredFile {
    pub bucket: String,
    pub path: String,
    pub url: String,
}

/// `{field}_{unix millis}.{ext}`; the field key is reduced to path-safe characters
/// and the extension is already alphanumeric
pub fn storage_path(field: &str, file: &SelectedFile, at: OffsetDateTime) -> String {
    let field: String = field
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("{}_{}.{}", field, millis, file.extension())
}

/// One pending upload, detached from the session that started it
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub(crate) generation: u64,
    pub field: String,
    pub bucket: String,
    pub path: String,
    file: SelectedFile,
}

impl UploadJob {
    pub fn new(field: &str, bucket: &str, file: SelectedFile) -> AppResult<Self> {
        if file.bytes.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }
        Ok(Self {
            generation: 0,
            field: field.to_string(),
            bucket: bucket.to_string(),
            path: storage_path(field, &file, OffsetDateTime::now_utc()),
            file,
        })
    }

    /// Upload the bytes and resolve their public URL
    pub async fn run(self, backend: &dyn Backend) -> UploadResult {
        let content_type = self.file.content_type();
        let outcome = backend
            .upload(&self.bucket, &self.path, self.file.bytes, &content_type)
            .await
            .map(|_| StoredFile {
                url: backend.public_url(&self.bucket, &self.path),
                bucket: self.bucket.clone(),
                path: self.path.clone(),
            });

        match &outcome {
            Ok(stored) => tracing::info!(field = %self.field, path = %stored.path, "File uploaded"),
            Err(e) => tracing::warn!(field = %self.field, "Upload failed: {}", e),
        }

        UploadResult {
            generation: self.generation,
            field: self.field,
            outcome,
        }
    }
}

#[derive(Debug)]
pub struct UploadResult {
    pub(crate) generation: u64,
    pub field: String,
    pub outcome: AppResult<StoredFile>,
}

/// Field keys with an upload outstanding
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    uploading: HashSet<String>,
}

impl UploadTracker {
    /// Mark the field busy; a second upload to the same field is refused
    pub fn begin(&mut self, field: &str) -> AppResult<()> {
        if !self.uploading.insert(field.to_string()) {
            return Err(AppError::Busy(format!("Upload to `{}`", field)));
        }
        Ok(())
    }

    pub fn finish(&mut self, field: &str) {
        self.uploading.remove(field);
    }

    pub fn is_uploading(&self, field: &str) -> bool {
        self.uploading.contains(field)
    }

    pub fn any(&self) -> bool {
        !self.uploading.is_empty()
    }

    pub fn clear(&mut self) {
        self.uploading.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, Operation};
    use time::macros::datetime;

    #[test]
    fn test_storage_path_combines_field_time_and_extension() {
        let at = datetime!(2025-01-02 03:04:05.678 UTC);
        let file = SelectedFile::new("portrait.final.PNG", vec![1]);
        assert_eq!(
            storage_path("image", &file, at),
            format!("image_{}.PNG", at.unix_timestamp() * 1000 + 678)
        );

        let bare = SelectedFile::new("README", vec![1]);
        assert!(storage_path("resume url", &bare, at).starts_with("resume_url_"));
        assert!(storage_path("resume url", &bare, at).ends_with(".bin"));
    }

    #[test]
    fn test_storage_path_ignores_unsafe_extension() {
        let at = datetime!(2025-01-02 03:04:05.678 UTC);
        let millis = at.unix_timestamp() * 1000 + 678;

        let traversal = SelectedFile::new("shot.png/../x", vec![1]);
        assert_eq!(storage_path("image", &traversal, at), format!("image_{}.bin", millis));

        let spaced = SelectedFile::new("cv.p df", vec![1]);
        assert_eq!(spaced.extension(), "bin");
        assert_eq!(spaced.content_type(), "application/octet-stream");
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(SelectedFile::new("cv.pdf", vec![1]).content_type(), "application/pdf");
        assert_eq!(SelectedFile::new("a.JPG", vec![1]).content_type(), "image/jpeg");
        assert_eq!(
            SelectedFile::new("a.xyz", vec![1]).content_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let result = UploadJob::new("image", "personal-assets", SelectedFile::new("a.png", vec![]));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_run_stores_bytes_and_resolves_public_url() {
        let backend = InMemoryBackend::new();
        let job = UploadJob::new("image", "personal-assets", SelectedFile::new("me.png", vec![7, 8]))
            .unwrap();
        let path = job.path.clone();

        let result = job.run(&backend).await;
        let stored = result.outcome.unwrap();
        assert_eq!(stored.path, path);
        assert_eq!(
            stored.url,
            format!("{}/personal-assets/{}", InMemoryBackend::PUBLIC_BASE, path)
        );
        assert_eq!(backend.object("personal-assets", &path).await, Some(vec![7, 8]));
    }

    #[tokio::test]
    async fn test_run_reports_backend_failure() {
        let backend = InMemoryBackend::new();
        backend
            .fail_on(Operation::Upload, "personal-assets", 0, "Bucket not found")
            .await;
        let job = UploadJob::new("image", "personal-assets", SelectedFile::new("me.png", vec![1]))
            .unwrap();

        let result = job.run(&backend).await;
        assert_eq!(
            result.outcome,
            Err(AppError::Backend("Bucket not found".to_string()))
        );
    }

    #[test]
    fn test_tracker_is_per_field() {
        let mut tracker = UploadTracker::default();
        tracker.begin("image").unwrap();
        tracker.begin("resume_url").unwrap();
        assert!(matches!(tracker.begin("image"), Err(AppError::Busy(_))));

        tracker.finish("image");
        assert!(!tracker.is_uploading("image"));
        assert!(tracker.is_uploading("resume_url"));
    }
}
