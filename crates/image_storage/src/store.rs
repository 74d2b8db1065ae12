use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// A stored campground image: its public URL and the object key it lives under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Public URL of the stored object.
    pub url: String,
    /// Object key within the bucket.
    pub filename: String,
}

impl StoredImage {
    /// URL of a width-200 rendition of this image.
    pub fn thumbnail_url(&self) -> String {
        format!("{}?w=200", self.url)
    }
}

/// Custom error type for image storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The upload to the object store failed
    #[error("Image upload failed: {0}")]
    Upload(String),

    /// The delete against the object store failed
    #[error("Image delete failed: {0}")]
    Delete(String),
}

/// Object-storage operations needed for campground images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores an image under a generated key and returns its public URL and key.
    async fn upload(
        &self,
        original_filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredImage, StorageError>;

    /// Removes a stored image by its object key.
    async fn delete(&self, filename: &str) -> Result<(), StorageError>;
}

/// Shared handle to the configured image store.
pub type ImageStoreHandle = Arc<dyn ImageStore>;

/// Generates the object key an uploaded file is stored under. The client's
/// file name only contributes its extension; the rest is a fresh UUID.
fn object_key(original_filename: &str) -> String {
    let extension: String = std::path::Path::new(original_filename)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("jpg")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    let extension = if extension.is_empty() {
        "jpg".to_string()
    } else {
        extension.to_lowercase()
    };

    format!("campgrounds/{}.{}", Uuid::new_v4(), extension)
}

/// S3-backed image store.
pub struct S3ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ImageStore {
    /// Builds the store from the ambient AWS configuration. The bucket name
    /// comes from `S3_BUCKET`; `S3_PUBLIC_URL` overrides the URL prefix
    /// stored objects are served from.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_s3::Client::new(&config);

        let bucket =
            std::env::var("S3_BUCKET").unwrap_or_else(|_| "camp-atlas-images".to_string());
        let region = config
            .region()
            .map(|region| region.to_string())
            .unwrap_or_else(|| "us-east-1".to_string());
        let public_base_url = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.{}.amazonaws.com", bucket, region));

        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn upload(
        &self,
        original_filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredImage, StorageError> {
        let filename = object_key(original_filename);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&filename)
            .content_type(content_type)
            .body(aws_sdk_s3::primitives::ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        Ok(StoredImage {
            url: format!("{}/{}", self.public_base_url, filename),
            filename,
        })
    }

    async fn delete(&self, filename: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(filename)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        Ok(())
    }
}

/// In-memory image store used by unit tests.
#[derive(Clone, Default)]
pub struct MemoryImageStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryImageStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// True when no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when an object is stored under the given key.
    pub fn contains(&self, filename: &str) -> bool {
        self.objects.lock().unwrap().contains_key(filename)
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(
        &self,
        original_filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredImage, StorageError> {
        let filename = object_key(original_filename);
        self.objects.lock().unwrap().insert(filename.clone(), data);

        Ok(StoredImage {
            url: format!("memory://{}", filename),
            filename,
        })
    }

    async fn delete(&self, filename: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keys_keep_only_a_sanitized_extension() {
        let key = object_key("../../etc/passwd.JPG");
        assert!(key.starts_with("campgrounds/"));
        assert!(key.ends_with(".jpg"));

        let key = object_key("no-extension");
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn object_keys_are_unique_per_upload() {
        assert_ne!(object_key("camp.png"), object_key("camp.png"));
    }

    #[test]
    fn thumbnail_url_is_a_width_200_rendition() {
        let image = StoredImage {
            url: "https://images.example.com/campgrounds/abc.jpg".to_string(),
            filename: "campgrounds/abc.jpg".to_string(),
        };

        assert_eq!(
            image.thumbnail_url(),
            "https://images.example.com/campgrounds/abc.jpg?w=200"
        );
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryImageStore::new();

        let stored = store
            .upload("site.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(store.contains(&stored.filename));
        assert_eq!(store.len(), 1);

        store.delete(&stored.filename).await.unwrap();
        assert!(store.is_empty());
    }
}
