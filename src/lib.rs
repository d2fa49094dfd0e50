//! A rate-controlled write-load harness for remote blob stores.
//!
//! `writeperf` drives synthetic write traffic against a blob store over
//! HTTP: a pool of writer threads uploads randomly sized payloads while a
//! shared [`Throttler`] keeps the aggregate rate at the configured target.
//! Every completed write is counted in the shared [`Metrics`] and appended
//! to an on-disk write log. On SIGINT or SIGTERM the pool drains cleanly
//! and a final [`Report`] summarizes throughput and latency.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod http;
pub mod metrics;
pub mod remote;
pub mod runner;
pub mod shutdown;
pub mod throttle;
mod worker;
pub mod workload;
pub mod writelog;

pub use config::Config;
pub use metrics::{Metrics, Report, Snapshot};
pub use remote::{BlobProperties, BlobStore, RemoteError};
pub use shutdown::ShutdownFlag;
pub use throttle::Throttler;
