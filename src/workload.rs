//! Payload and metadata generation for write operations.

use std::io;

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::remote::BlobProperties;

/// Service id attached to every generated blob.
pub const SERVICE_ID: &str = "test";

/// Exclusive upper bound on generated metadata sizes, in bytes.
pub const MAX_METADATA_SIZE: usize = 1024;

/// Generates the write operations for a single writer.
///
/// Payload sizes are drawn uniformly from the configured range, inclusive on
/// both ends. Each writer owns its own generator; nothing here is shared.
#[derive(Debug)]
pub struct Workload {
    min_blob_size: u64,
    max_blob_size: u64,
    rng: SmallRng,
}

impl Workload {
    /// Creates a generator for payload sizes in `[min_blob_size, max_blob_size]`.
    ///
    /// The range must not be inverted.
    pub fn new(min_blob_size: u64, max_blob_size: u64) -> Self {
        Self {
            min_blob_size,
            max_blob_size,
            rng: SmallRng::seed_from_u64(rand::random()),
        }
    }

    /// Produces the properties, metadata and payload for the next write.
    pub fn next_write(&mut self) -> (BlobProperties, Vec<u8>, Payload) {
        let blob_size = self
            .rng
            .random_range(self.min_blob_size..=self.max_blob_size);
        let properties = BlobProperties {
            blob_size,
            service_id: SERVICE_ID.to_owned(),
        };

        let metadata_size = self.rng.random_range(0..MAX_METADATA_SIZE);
        let mut metadata = vec![0; metadata_size];
        self.rng.fill_bytes(&mut metadata);

        let payload = Payload {
            len: blob_size,
            rng: SmallRng::seed_from_u64(self.rng.next_u64()),
        };

        (properties, metadata, payload)
    }
}

/// Randomized contents of a blob.
///
/// Reading produces `len` bytes of seeded random data, then end of stream.
/// Payloads with equally seeded RNGs produce identical bytes.
#[derive(Clone, Debug)]
pub struct Payload {
    /// The number of bytes left to read.
    pub len: u64,
    /// The RNG producing the payload bytes.
    pub rng: SmallRng,
}

impl io::Read for Payload {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let fill_len = (buf.len() as u64).min(self.len) as usize;
        self.rng.fill_bytes(&mut buf[..fill_len]);
        self.len -= fill_len as u64;
        Ok(fill_len)
    }
}
