//! The writer loop executed by each pool thread.

use std::time::Instant;

use tracing::{debug, error};

use crate::metrics::Metrics;
use crate::remote::BlobStore;
use crate::shutdown::ShutdownFlag;
use crate::throttle::Throttler;
use crate::workload::Workload;
use crate::writelog::WriteLog;

/// Writes blobs until shutdown is requested or the remote fails.
///
/// The first remote error permanently stops this writer; the pool does not
/// replace it.
pub(crate) fn run_writer(
    remote: &dyn BlobStore,
    workload: &mut Workload,
    throttler: &Throttler,
    metrics: &Metrics,
    log: &WriteLog,
    shutdown: &ShutdownFlag,
) {
    while !shutdown.is_set() {
        let (properties, metadata, payload) = workload.next_write();

        let started = Instant::now();
        match remote.put(&properties, &metadata, payload) {
            Ok(key) => {
                let latency = started.elapsed();
                metrics.record_completion(latency);
                log.append(&key);
                debug!(key = %key, blob_size = properties.blob_size, ?latency, "wrote blob");
                throttler.admit(1);
            }
            Err(error) => {
                error!(%error, "write failed; stopping this writer");
                break;
            }
        }
    }
}
