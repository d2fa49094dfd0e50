//! The seam between the writer pool and the storage service under test.

use thiserror::Error;

use crate::workload::Payload;

/// Properties describing a blob about to be uploaded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlobProperties {
    /// Size of the payload in bytes.
    pub blob_size: u64,
    /// Identifier of the service issuing the write.
    pub service_id: String,
}

/// A remote blob store that the writer pool can drive.
///
/// Implementations may block for as long as they like; the harness imposes
/// no timeout on a write.
pub trait BlobStore: Send + Sync {
    /// Uploads one blob and returns the key assigned by the store.
    fn put(
        &self,
        properties: &BlobProperties,
        metadata: &[u8],
        payload: Payload,
    ) -> Result<String, RemoteError>;
}

/// Errors surfaced by a remote blob store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request failed in transit, before or while reading the response.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("remote answered {status}: {body}")]
    Status {
        /// Status code of the response.
        status: reqwest::StatusCode,
        /// The response body, as far as it could be read.
        body: String,
    },
}
