//! Aggregate counters shared by the writer pool.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic counters tracking completed writes across the pool.
///
/// Writers record completions concurrently and both counters only ever
/// grow. A [`Snapshot`] taken while writers are still running may tear
/// between the two counters; the final report only reads them after the
/// pool has drained.
#[derive(Debug, Default)]
pub struct Metrics {
    total_ops: AtomicU64,
    total_latency_ns: AtomicU64,
}

impl Metrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed write and the time the remote took to serve it.
    pub fn record_completion(&self, latency: Duration) {
        self.total_ops.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Reads the current counter values.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            total_ops: self.total_ops.load(Ordering::Relaxed),
            total_latency: Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed)),
        }
    }
}

/// A point-in-time copy of the pool counters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Snapshot {
    /// Number of completed writes.
    pub total_ops: u64,
    /// Summed remote latency across all completed writes.
    pub total_latency: Duration,
}

impl Snapshot {
    /// Mean remote latency per write, or `None` if nothing completed.
    pub fn average_latency(&self) -> Option<Duration> {
        if self.total_ops == 0 {
            return None;
        }
        let avg_ns = self.total_latency.as_nanos() / u128::from(self.total_ops);
        Some(Duration::from_nanos(avg_ns as u64))
    }
}

/// Final run summary, printed once after the pool has drained.
#[derive(Clone, Copy, Debug)]
pub struct Report {
    /// Number of completed writes.
    pub total_writes: u64,
    /// Summed remote latency across all completed writes.
    pub total_write_time: Duration,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl Report {
    /// Builds the report from the final counter snapshot.
    pub fn new(snapshot: Snapshot, elapsed: Duration) -> Self {
        Self {
            total_writes: snapshot.total_ops,
            total_write_time: snapshot.total_latency,
            elapsed,
        }
    }

    /// Mean remote latency per write, or `None` if nothing completed.
    pub fn average_time_per_write(&self) -> Option<Duration> {
        if self.total_writes == 0 {
            return None;
        }
        let avg_ns = self.total_write_time.as_nanos() / u128::from(self.total_writes);
        Some(Duration::from_nanos(avg_ns as u64))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total writes: {}, total write time: {:.3}s",
            self.total_writes,
            self.total_write_time.as_secs_f64()
        )?;
        match self.average_time_per_write() {
            Some(average) => write!(f, ", average time per write: {:.6}s", average.as_secs_f64()),
            None => write!(f, ", average time per write: n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn counts_every_completion_exactly_once() {
        let metrics = Arc::new(Metrics::new());

        let writers: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.record_completion(Duration::from_micros(3));
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_ops, 8000);
        assert_eq!(snapshot.total_latency, Duration::from_micros(3) * 8000);
    }

    #[test]
    fn average_is_the_mean_of_recorded_latencies() {
        let metrics = Metrics::new();
        metrics.record_completion(Duration::from_millis(10));
        metrics.record_completion(Duration::from_millis(20));
        metrics.record_completion(Duration::from_millis(60));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.average_latency(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn empty_counters_have_no_average() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.total_ops, 0);
        assert_eq!(snapshot.average_latency(), None);
    }

    #[test]
    fn report_renders_all_three_aggregates() {
        let snapshot = Snapshot {
            total_ops: 4,
            total_latency: Duration::from_secs(2),
        };
        let report = Report::new(snapshot, Duration::from_secs(10));
        assert_eq!(
            report.to_string(),
            "total writes: 4, total write time: 2.000s, average time per write: 0.500000s"
        );
    }

    #[test]
    fn report_without_writes_has_an_undefined_average() {
        let snapshot = Snapshot {
            total_ops: 0,
            total_latency: Duration::ZERO,
        };
        let report = Report::new(snapshot, Duration::from_secs(1));
        assert_eq!(
            report.to_string(),
            "total writes: 0, total write time: 0.000s, average time per write: n/a"
        );
    }
}
