//! Runs the real binary against an in-process blob store and interrupts it.

use std::process::{Child, Command, Output, Stdio};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::put;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use serde_json::{Value, json};
use uuid::Uuid;

const WRITEPERF_EXE: &str = env!("CARGO_BIN_EXE_writeperf");

async fn put_blob(body: Bytes) -> (StatusCode, Json<Value>) {
    drop(body);
    (StatusCode::OK, Json(json!({ "key": Uuid::new_v4().to_string() })))
}

fn interrupt_and_wait(child: Child) -> Output {
    let pid = Pid::from_raw(child.id() as i32);
    signal::kill(pid, Signal::SIGINT).expect("failed to send SIGINT");
    child
        .wait_with_output()
        .expect("failed to wait on the child process")
}

#[tokio::test(flavor = "multi_thread")]
async fn sigint_drains_and_prints_the_report() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/blobs", put(put_blob));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("writeperflog");

    let child = Command::new(WRITEPERF_EXE)
        .arg("--remote")
        .arg(format!("http://{addr}"))
        .arg("--writers")
        .arg("2")
        .arg("--writes-per-second")
        .arg("200")
        .arg("--min-blob-size")
        .arg("1024")
        .arg("--max-blob-size")
        .arg("65536")
        .arg("--log-path")
        .arg(&log_path)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn the binary");

    // Let the writers make progress before interrupting.
    tokio::time::sleep(Duration::from_secs(3)).await;

    let output = interrupt_and_wait(child);
    assert!(
        output.status.success(),
        "the binary exited with {:?}",
        output.status.code()
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("total writes:"), "unexpected stdout: {stdout}");
    assert!(
        stdout.contains("average time per write:"),
        "unexpected stdout: {stdout}"
    );

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.lines().count() > 0, "the write log is empty");
    assert!(log.lines().all(|line| line.starts_with("Blob-")));
}

#[test]
fn an_inverted_size_range_is_rejected() {
    let output = Command::new(WRITEPERF_EXE)
        .arg("--min-blob-size")
        .arg("4096")
        .arg("--max-blob-size")
        .arg("1024")
        .output()
        .expect("failed to run the binary");
    assert!(!output.status.success());
}
