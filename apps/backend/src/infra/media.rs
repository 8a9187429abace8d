//! Media storage collaborator: paintings and avatars live outside the room
//! database, the orchestrator only keeps references.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use lazy_regex::regex;

use crate::errors::domain::{DomainError, InfraErrorKind};

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores a blob and returns the reference clients can load it by.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, DomainError>;
}

/// Filesystem-backed store serving blobs under a URL prefix.
pub struct FsMediaStore {
    root: PathBuf,
    base_url: String,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                DomainError::infra(InfraErrorKind::Media, format!("create media dir: {err}"))
            })?;
        }
        tokio::fs::write(&path, bytes).await.map_err(|err| {
            DomainError::infra(InfraErrorKind::Media, format!("write media blob: {err}"))
        })?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

/// Decodes a `data:image/png;base64,...` payload (or bare base64).
pub fn decode_data_url(media: &str) -> Result<Vec<u8>, DomainError> {
    let encoded = regex!(r"^data:[\w/+.-]+;base64,").replace(media, "");
    BASE64.decode(encoded.trim()).map_err(|err| {
        DomainError::infra(InfraErrorKind::Media, format!("invalid base64 payload: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_strips_the_data_url_prefix() {
        let bytes = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn decode_accepts_bare_base64() {
        assert_eq!(decode_data_url("aGVsbG8=").unwrap(), b"hello");
    }

    #[tokio::test]
    async fn fs_store_roundtrips_a_blob() {
        let root = std::env::temp_dir().join(format!("paintparty-media-{}", uuid::Uuid::new_v4()));
        let store = FsMediaStore::new(&root, "/media");
        let url = store.put("001/1_ABCD/avatar/2_kot.png", b"png").await.unwrap();
        assert_eq!(url, "/media/001/1_ABCD/avatar/2_kot.png");
        let on_disk = tokio::fs::read(root.join("001/1_ABCD/avatar/2_kot.png"))
            .await
            .unwrap();
        assert_eq!(on_disk, b"png");
    }
}
