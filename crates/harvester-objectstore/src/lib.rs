//! Pluggable object storage (§6 "Object storage path layout", §9 "the
//! object-storage adapters... specified only via the upload/download/delete
//! contract"): the [`ObjectStore`] trait plus three backends — S3-compatible
//! (via the `rust-s3` crate, as used by `index-scheduler`), OpenStack Swift
//! (hand-rolled over `reqwest`, since no vetted Swift client crate exists),
//! and a local-disk fallback for development and for the mirror object
//! stores (arXiv/PLOS) which this core only ever reads from.

use std::fs;
use std::io::Read;
use std::path::Path;

use s3::creds::Credentials;
use s3::{Bucket, Region};

pub mod swift;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object store request failed: {0}")]
    S3(#[from] s3::error::S3Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("unexpected status {status} from object store: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("invalid object store credentials: {0}")]
    Credentials(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The upload/download/delete contract the Batch Orchestrator drives every
/// configured destination through. `key` is always a full object-store key
/// as produced by `harvester_types::storage_path::object_key`.
pub trait ObjectStore: Send + Sync {
    fn upload_file(&self, local_path: &Path, key: &str) -> Result<()>;
    fn download_to_file(&self, key: &str, local_path: &Path) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn exists(&self, key: &str) -> Result<bool>;

    /// Delete every object the store holds. Only the Reset operation calls
    /// this, and only for a Swift backend (§4.6: "S3 back-end is
    /// intentionally left untouched").
    fn delete_all(&self) -> Result<()> {
        Ok(())
    }
}

/// S3-compatible backend built on `rust-s3`, as `index-scheduler` uses.
pub struct S3Store {
    bucket: Box<Bucket>,
}

pub struct S3Config {
    pub bucket_name: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl S3Store {
    pub fn new(config: &S3Config) -> Result<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .unwrap_or(Region::Custom { region: config.region.clone(), endpoint: String::new() }),
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| Error::Credentials(e.to_string()))?;

        let bucket = Bucket::new(&config.bucket_name, region, credentials)?.with_path_style();
        Ok(S3Store { bucket })
    }
}

impl ObjectStore for S3Store {
    fn upload_file(&self, local_path: &Path, key: &str) -> Result<()> {
        let mut file = fs::File::open(local_path)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        let response = self.bucket.put_object_blocking(key, &buf)?;
        if response.status_code() >= 300 {
            return Err(Error::UnexpectedStatus {
                status: response.status_code(),
                body: String::from_utf8_lossy(response.as_slice()).into_owned(),
            });
        }
        Ok(())
    }

    fn download_to_file(&self, key: &str, local_path: &Path) -> Result<()> {
        let response = self.bucket.get_object_blocking(key)?;
        if response.status_code() == 404 {
            return Err(Error::NotFound(key.to_string()));
        }
        if response.status_code() >= 300 {
            return Err(Error::UnexpectedStatus {
                status: response.status_code(),
                body: String::from_utf8_lossy(response.as_slice()).into_owned(),
            });
        }
        fs::write(local_path, response.as_slice())?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.bucket.delete_object_blocking(key)?;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let response = self.bucket.head_object_blocking(key);
        Ok(response.is_ok())
    }
}

/// Object store backed directly by the local filesystem: used for the
/// development/no-upload-configured case, and for the arXiv/PLOS mirror
/// stores the core only ever reads from via `download_to_file`.
pub struct LocalDiskStore {
    root: std::path::PathBuf,
}

impl LocalDiskStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(LocalDiskStore { root })
    }

    fn resolve(&self, key: &str) -> std::path::PathBuf {
        self.root.join(key)
    }
}

impl ObjectStore for LocalDiskStore {
    fn upload_file(&self, local_path: &Path, key: &str) -> Result<()> {
        let dest = self.resolve(key);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local_path, &dest)?;
        Ok(())
    }

    fn download_to_file(&self, key: &str, local_path: &Path) -> Result<()> {
        let src = self.resolve(key);
        if !src.is_file() {
            return Err(Error::NotFound(key.to_string()));
        }
        fs::copy(&src, local_path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key);
        if path.is_file() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.resolve(key).is_file())
    }

    fn delete_all(&self) -> Result<()> {
        if self.root.is_dir() {
            fs::remove_dir_all(&self.root)?;
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn local_disk_round_trips_upload_and_download() {
        let src_dir = TempDir::new().unwrap();
        let store_dir = TempDir::new().unwrap();
        let store = LocalDiskStore::new(store_dir.path()).unwrap();

        let local_path = src_dir.path().join("a.pdf");
        fs::write(&local_path, b"%PDF-1.4").unwrap();

        let key = "12/34/56/78/123456789abcdef0123456789abcdef0/123456789abcdef0123456789abcdef0.pdf";
        store.upload_file(&local_path, key).unwrap();
        assert!(store.exists(key).unwrap());

        let dest_path = src_dir.path().join("roundtrip.pdf");
        store.download_to_file(key, &dest_path).unwrap();
        assert_eq!(fs::read(&dest_path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn local_disk_delete_all_empties_root() {
        let store_dir = TempDir::new().unwrap();
        let store = LocalDiskStore::new(store_dir.path()).unwrap();
        let src_dir = TempDir::new().unwrap();
        let local_path = src_dir.path().join("a.json");
        fs::write(&local_path, b"{}").unwrap();
        store.upload_file(&local_path, "a/b/c/d/e/e.json").unwrap();

        store.delete_all().unwrap();

        assert!(!store.exists("a/b/c/d/e/e.json").unwrap());
    }

    #[test]
    fn missing_object_download_is_not_found() {
        let store_dir = TempDir::new().unwrap();
        let store = LocalDiskStore::new(store_dir.path()).unwrap();
        let dest = store_dir.path().join("out.pdf");
        let err = store.download_to_file("missing.pdf", &dest).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
