//! Storage locations backed by `object_store`

use crate::config::join_root;
use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Split a full object URI into its parent root and object name
///
/// `s3://bucket/raw/a.json` becomes `("s3://bucket/raw", "a.json")`; a bare
/// name resolves against the current directory.
pub fn split_uri(uri: &str) -> Result<(&str, &str)> {
    let uri = uri.trim_end_matches('/');
    let (root, name) = match uri.rsplit_once('/') {
        Some((root, name)) => (root, name),
        None => (".", uri),
    };

    if name.is_empty() || root.ends_with(':') || root.ends_with(":/") {
        return Err(Error::config(format!("Not an object location: {uri}")));
    }

    Ok((if root.is_empty() { "/" } else { root }, name))
}

/// A storage root parsed from a URL
#[derive(Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// URL scheme (s3, r2, gs, az, file)
    scheme: String,
    /// Root as given, used to report full paths
    root: String,
}

impl fmt::Debug for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageLocation")
            .field("scheme", &self.scheme)
            .field("root", &self.root)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl StorageLocation {
    /// Parse a storage root for reading
    ///
    /// A local root must already exist.
    pub fn parse(url: &str) -> Result<Self> {
        Self::parse_inner(url, false)
    }

    /// Parse a storage root for writing
    ///
    /// A missing local root directory is created.
    pub fn parse_writable(url: &str) -> Result<Self> {
        Self::parse_inner(url, true)
    }

    fn parse_inner(url: &str, create: bool) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url, create)
        }
    }

    /// Split `bucket/prefix` into its parts
    fn bucket_and_prefix(without_scheme: &str) -> (&str, String) {
        match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].trim_end_matches('/').to_string(),
            ),
            None => (without_scheme, String::new()),
        }
    }

    /// Parse S3 or R2 URL
    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let without_scheme = url
            .strip_prefix(&format!("{scheme}://"))
            .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

        let (bucket, prefix) = Self::bucket_and_prefix(without_scheme);
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in URL: {url}")));
        }

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: scheme.to_string(),
            root: url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::config(format!("Invalid GCS URL: {url}")))?;

        let (bucket, prefix) = Self::bucket_and_prefix(without_scheme);
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in URL: {url}")));
        }

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
            root: url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("az://")
            .ok_or_else(|| Error::config(format!("Invalid Azure URL: {url}")))?;

        let (container, prefix) = Self::bucket_and_prefix(without_scheme);
        if container.is_empty() {
            return Err(Error::config(format!("Missing container in URL: {url}")));
        }

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
            root: url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str, create: bool) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);
        let dir = std::path::Path::new(path);

        if create {
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
        } else if !dir.is_dir() {
            return Err(Error::FileNotFound {
                path: path.to_string(),
            });
        }

        let store = LocalFileSystem::new_with_prefix(dir)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        let root = if path == "/" {
            path.to_string()
        } else {
            path.trim_end_matches('/').to_string()
        };

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            root,
        })
    }

    /// Check if this is a cloud location (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Root as given, without a trailing separator
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Full path of an object under this root
    pub fn full_path(&self, name: &str) -> String {
        join_root(&self.root, name)
    }

    fn object_path(&self, name: &str) -> ObjectPath {
        let name = name.trim_start_matches('/');
        if self.prefix.is_empty() {
            ObjectPath::from(name)
        } else {
            ObjectPath::from(format!("{}/{name}", self.prefix))
        }
    }

    /// Read an object in full
    pub async fn read(&self, name: &str) -> Result<Bytes> {
        let path = self.object_path(name);
        debug!("Reading {}", self.full_path(name));

        let result = self.store.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => Error::FileNotFound {
                path: self.full_path(name),
            },
            other => Error::Storage(other),
        })?;

        Ok(result.bytes().await?)
    }

    /// Write bytes to an object, replacing any existing content
    ///
    /// Returns the full path for logging.
    pub async fn write(&self, name: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(name);
        let full_path = self.full_path(name);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::output(format!("Failed to write {full_path}: {e}")))?;

        Ok(full_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_uri() {
        assert_eq!(
            split_uri("s3://bucket/raw/a.json").unwrap(),
            ("s3://bucket/raw", "a.json")
        );
        assert_eq!(
            split_uri("s3://bucket/a.json").unwrap(),
            ("s3://bucket", "a.json")
        );
        assert_eq!(split_uri("/tmp/in/a.json").unwrap(), ("/tmp/in", "a.json"));
        assert_eq!(split_uri("/a.json").unwrap(), ("/", "a.json"));
        assert_eq!(split_uri("a.json").unwrap(), (".", "a.json"));
        assert!(split_uri("s3://bucket").is_err());
    }

    #[test]
    fn test_parse_local_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().to_str().unwrap();
        let location = StorageLocation::parse(path).unwrap();
        assert_eq!(location.scheme(), "file");
        assert!(!location.is_cloud());
        assert_eq!(location.root(), path.trim_end_matches('/'));
    }

    #[test]
    fn test_parse_local_missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope");
        let result = StorageLocation::parse(missing.to_str().unwrap());
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_writable_creates_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("processed_csv");
        let url = format!("file://{}", out.display());
        let location = StorageLocation::parse_writable(&url).unwrap();
        assert!(out.is_dir());
        assert_eq!(location.full_path("a.csv"), format!("{}/a.csv", out.display()));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let location = StorageLocation::parse(temp_dir.path().to_str().unwrap()).unwrap();

        let written = location
            .write("out.csv", Bytes::from_static(b"a,b\n1,2\n"))
            .await
            .unwrap();
        assert!(written.ends_with("/out.csv"));

        // Writing again replaces the object
        location
            .write("out.csv", Bytes::from_static(b"a\n"))
            .await
            .unwrap();
        let data = location.read("out.csv").await.unwrap();
        assert_eq!(&data[..], b"a\n");
    }

    #[tokio::test]
    async fn test_read_missing_object() {
        let temp_dir = tempfile::tempdir().unwrap();
        let location = StorageLocation::parse(temp_dir.path().to_str().unwrap()).unwrap();
        let err = location.read("absent.json").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("absent.json"));
    }
}
