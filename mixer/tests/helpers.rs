//! Test helper utilities for mixer integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, header};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::DuplexStream;
use tokio::sync::mpsc;

use mixer::{ProcessSupervisor, StatusCache};

/// Supervisor wired to in-memory streams standing in for the child
pub struct FakePipe {
    pub supervisor: Arc<ProcessSupervisor>,
    /// Read end of the child's stdin
    pub child_stdin: DuplexStream,
    /// Write end of the child's stdout
    pub child_stdout: mpsc::Sender<String>,
}

pub fn fake_pipe() -> FakePipe {
    let (stdin, child_stdin) = tokio::io::duplex(4096);
    let (child_stdout, stdout) = mpsc::channel(32);
    let supervisor = ProcessSupervisor::from_streams(stdin, stdout, Arc::new(StatusCache::new()));

    FakePipe {
        supervisor: Arc::new(supervisor),
        child_stdin,
        child_stdout,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper to wait for async conditions with timeout
pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if condition().await {
            return true;
        }

        if start.elapsed() > timeout {
            return false;
        }

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
