//! Run configuration for the write-load harness.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};

/// Validated settings for one load-generation run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of concurrent writer threads.
    pub writers: usize,
    /// Smallest generated payload size, in bytes.
    pub min_blob_size: u64,
    /// Largest generated payload size, in bytes.
    pub max_blob_size: u64,
    /// Aggregate target write rate across the whole pool.
    pub writes_per_second: u64,
    /// Endpoint of the blob store under test.
    pub remote: String,
    /// Location of the append-only write log.
    pub log_path: PathBuf,
}

impl Config {
    /// Checks the settings before any writer is started.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.writers >= 1, "at least one writer is required");
        ensure!(
            self.writes_per_second >= 1,
            "the write rate must be at least one per second"
        );
        ensure!(
            self.min_blob_size <= self.max_blob_size,
            "min blob size ({}) exceeds max blob size ({})",
            self.min_blob_size,
            self.max_blob_size
        );
        self.remote
            .parse::<reqwest::Url>()
            .with_context(|| format!("invalid remote endpoint {:?}", self.remote))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            writers: 4,
            min_blob_size: 51200,
            max_blob_size: 4194304,
            writes_per_second: 1000,
            remote: "http://127.0.0.1:8888".to_owned(),
            log_path: PathBuf::from("writeperflog"),
        }
    }

    #[test]
    fn the_default_shape_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn rejects_an_empty_pool() {
        let mut config = config();
        config.writers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_a_zero_rate() {
        let mut config = config();
        config.writes_per_second = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_an_inverted_size_range() {
        let mut config = config();
        config.min_blob_size = 2;
        config.max_blob_size = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_a_single_size() {
        let mut config = config();
        config.min_blob_size = 4096;
        config.max_blob_size = 4096;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_an_unparseable_remote() {
        let mut config = config();
        config.remote = "not an endpoint".to_owned();
        assert!(config.validate().is_err());
    }
}
