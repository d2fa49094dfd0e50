//! HTTP implementation of the remote blob store.

use reqwest::blocking::{Body, Client};
use serde::Deserialize;

use crate::remote::{BlobProperties, BlobStore, RemoteError};
use crate::workload::Payload;

/// Header carrying the service id of the uploading client.
pub const HEADER_SERVICE: &str = "x-blob-service";
/// Header carrying the payload size in bytes.
pub const HEADER_BLOB_SIZE: &str = "x-blob-size";
/// Header carrying the hex-encoded user metadata.
pub const HEADER_BLOB_META: &str = "x-blob-meta";

/// A remote implementation uploading blobs over HTTP.
///
/// One instance is shared by all writers; the underlying client pools its
/// connections.
#[derive(Debug)]
pub struct HttpRemote {
    remote: String,
    client: Client,
}

impl HttpRemote {
    /// Creates a remote talking to the service at `remote`.
    ///
    /// The client is built without a request timeout: a hung upload blocks
    /// its writer until the process exits.
    pub fn new(remote: impl Into<String>) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(None).build()?;
        Ok(Self {
            remote: remote.into(),
            client,
        })
    }
}

/// The response returned from the service after uploading a blob.
#[derive(Debug, Deserialize)]
struct PutResponse {
    key: String,
}

impl BlobStore for HttpRemote {
    fn put(
        &self,
        properties: &BlobProperties,
        metadata: &[u8],
        payload: Payload,
    ) -> Result<String, RemoteError> {
        let payload_len = payload.len;
        let response = self
            .client
            .put(format!("{}/blobs", self.remote))
            .header(HEADER_SERVICE, &properties.service_id)
            .header(HEADER_BLOB_SIZE, properties.blob_size)
            .header(HEADER_BLOB_META, hex::encode(metadata))
            .body(Body::sized(payload, payload_len))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Status { status, body });
        }

        let response: PutResponse = response.json()?;
        Ok(response.key)
    }
}
