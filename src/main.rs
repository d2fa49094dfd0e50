//! Command-line entry point for the write-load harness.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use argh::FromArgs;
use bytesize::ByteSize;
use tracing_subscriber::EnvFilter;

use writeperf::config::Config;
use writeperf::http::HttpRemote;
use writeperf::runner;
use writeperf::shutdown::{self, ShutdownFlag};

const DEFAULT_REMOTE: &str = "http://127.0.0.1:8888";
const DEFAULT_LOG_PATH: &str = "writeperflog";

/// Write-load generator for a remote blob store.
#[derive(Debug, FromArgs)]
struct Args {
    /// number of concurrent writer threads
    #[argh(option, default = "4")]
    writers: usize,

    /// smallest payload size to upload
    #[argh(option, default = "ByteSize::b(51200)")]
    min_blob_size: ByteSize,

    /// largest payload size to upload
    #[argh(option, default = "ByteSize::b(4194304)")]
    max_blob_size: ByteSize,

    /// aggregate writes per second across the whole pool
    #[argh(option, default = "1000")]
    writes_per_second: u64,

    /// endpoint of the blob store under test
    #[argh(option, default = "DEFAULT_REMOTE.to_string()")]
    remote: String,

    /// path of the per-write log
    #[argh(option, default = "PathBuf::from(DEFAULT_LOG_PATH)")]
    log_path: PathBuf,

    /// log every completed write
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    init_tracing(args.verbose);

    let config = Config {
        writers: args.writers,
        min_blob_size: args.min_blob_size.0,
        max_blob_size: args.max_blob_size.0,
        writes_per_second: args.writes_per_second,
        remote: args.remote,
        log_path: args.log_path,
    };
    config.validate()?;

    let remote =
        Arc::new(HttpRemote::new(&config.remote).context("failed to set up the http client")?);

    let shutdown = ShutdownFlag::new();
    shutdown::listen_for_termination(shutdown.clone())?;

    let report = runner::run(remote, &config, shutdown)?;
    println!("{report}");

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose { "info,writeperf=debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
