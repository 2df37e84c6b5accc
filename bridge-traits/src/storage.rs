//! Remote storage listing.
//!
//! The listing-backed catalog enumerates audio files in a remote bucket
//! through this bridge. Authentication, paging and the HTTP client are the
//! host's business; the core only needs the flattened file list and a way to
//! turn a file name into a playable URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::Result, platform::PlatformSendSync};

/// File entry returned by a [`RemoteListing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Provider-assigned file identifier.
    pub file_id: String,
    /// Object key / file name, possibly including folder prefixes.
    pub file_name: String,
    /// MIME type reported by the provider.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub content_length: u64,
    /// Upload time, when reported.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl RemoteFile {
    pub fn new(file_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            content_type: None,
            content_length: 0,
            uploaded_at: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_content_length(mut self, content_length: u64) -> Self {
        self.content_length = content_length;
        self
    }
}

/// Remote file listing trait
///
/// Implemented by the host on top of its storage provider SDK (B2, S3, a
/// CDN manifest, ...).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::RemoteListing;
///
/// async fn count_files(listing: &dyn RemoteListing) -> usize {
///     listing.list_files().await.map(|files| files.len()).unwrap_or(0)
/// }
/// ```
#[async_trait::async_trait]
pub trait RemoteListing: PlatformSendSync {
    /// List every file visible to the configured credentials.
    async fn list_files(&self) -> Result<Vec<RemoteFile>>;

    /// Build the download URL for a file name.
    fn download_url(&self, file_name: &str) -> String;
}
