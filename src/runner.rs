//! Spawns the writer pool and waits for it to drain.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use bytesize::ByteSize;
use tracing::{error, info};

use crate::config::Config;
use crate::metrics::{Metrics, Report};
use crate::remote::BlobStore;
use crate::shutdown::{CompletionBarrier, ShutdownFlag};
use crate::throttle::Throttler;
use crate::worker;
use crate::workload::Workload;
use crate::writelog::WriteLog;

/// Runs the configured writer pool against `remote` until `shutdown` is set
/// or every writer has stopped on its own, then returns the final report.
///
/// The report is produced strictly after the pool has drained, so it
/// reflects every completed write.
pub fn run(remote: Arc<dyn BlobStore>, config: &Config, shutdown: ShutdownFlag) -> Result<Report> {
    let throttler = Arc::new(Throttler::new(config.writes_per_second as f64));
    let metrics = Arc::new(Metrics::new());
    let log = Arc::new(WriteLog::create(&config.log_path).with_context(|| {
        format!(
            "failed to create the write log at {}",
            config.log_path.display()
        )
    })?);
    let barrier = CompletionBarrier::new(config.writers);

    info!(
        writers = config.writers,
        writes_per_second = config.writes_per_second,
        min_blob_size = %ByteSize(config.min_blob_size),
        max_blob_size = %ByteSize(config.max_blob_size),
        "starting the writer pool"
    );
    let started = Instant::now();

    let mut handles = Vec::with_capacity(config.writers);
    for i in 0..config.writers {
        let remote = Arc::clone(&remote);
        let throttler = Arc::clone(&throttler);
        let metrics = Arc::clone(&metrics);
        let log = Arc::clone(&log);
        let writer_shutdown = shutdown.clone();
        let guard = barrier.guard();
        let mut workload = Workload::new(config.min_blob_size, config.max_blob_size);

        let spawned = thread::Builder::new()
            .name(format!("writer-{i}"))
            .spawn(move || {
                let _guard = guard;
                worker::run_writer(
                    remote.as_ref(),
                    &mut workload,
                    &throttler,
                    &metrics,
                    &log,
                    &writer_shutdown,
                );
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(spawn_error) => {
                // Writers that never started must not keep the barrier up.
                shutdown.set();
                for _ in (i + 1)..config.writers {
                    drop(barrier.guard());
                }
                barrier.wait();
                for handle in handles {
                    let _ = handle.join();
                }
                return Err(spawn_error).context("failed to spawn a writer thread");
            }
        }
    }

    barrier.wait();
    // The barrier covers the drain; joining additionally reaps the threads
    // and surfaces writer panics.
    for handle in handles {
        if handle.join().is_err() {
            error!("a writer thread panicked");
        }
    }

    let elapsed = started.elapsed();
    let report = Report::new(metrics.snapshot(), elapsed);
    info!(?elapsed, total_writes = report.total_writes, "writer pool drained");
    Ok(report)
}
