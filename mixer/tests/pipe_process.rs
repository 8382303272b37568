//! Supervisor tests against real child processes
//!
//! Uses standard unix tools as stand-ins for the mixing pipe: `cat` echoes
//! every submitted line back as its status.

#![cfg(unix)]

mod helpers;

use std::sync::Arc;

use helpers::wait_for_condition;
use mixer::core::PipeState;
use mixer::{MixerControl, MixerError, PipeConfig, ProcessSupervisor, StatusCache};

fn shell(script: &str) -> PipeConfig {
    PipeConfig::new("sh").with_args(vec!["-c".to_string(), script.to_string()])
}

#[tokio::test]
async fn test_cat_echoes_submission_into_status() {
    let supervisor = ProcessSupervisor::start(&PipeConfig::new("cat"), Arc::new(StatusCache::new())).unwrap();
    assert!(supervisor.has_child());
    assert!(supervisor.pid().is_some());
    assert_eq!(supervisor.status().await, "Ready");

    supervisor.submit("track.mp3").await.unwrap();

    let echoed = wait_for_condition(|| async { supervisor.status().await == "track.mp3" }, 2000).await;
    assert!(echoed, "status never reflected the echoed command");
}

#[tokio::test]
async fn test_sequential_submissions_update_status() {
    let supervisor = ProcessSupervisor::start(&PipeConfig::new("cat"), Arc::new(StatusCache::new())).unwrap();

    for name in ["a.mp3", "b.mp3", "c.mp3"] {
        supervisor.submit(name).await.unwrap();
        let echoed = wait_for_condition(|| async { supervisor.status().await == name }, 2000).await;
        assert!(echoed, "status never reached {name}");
    }
}

#[tokio::test]
async fn test_status_survives_child_exit() {
    let supervisor = ProcessSupervisor::start(
        &shell("echo 'Now playing: Finale'; exit 0"),
        Arc::new(StatusCache::new()),
    )
    .unwrap();

    let closed = wait_for_condition(|| async { supervisor.output_closed() }, 2000).await;
    assert!(closed, "reader did not observe child exit");

    for _ in 0..3 {
        assert_eq!(supervisor.status().await, "Now playing: Finale");
    }
}

#[tokio::test]
async fn test_submit_fails_once_child_has_exited() {
    let supervisor = ProcessSupervisor::start(&shell("exit 0"), Arc::new(StatusCache::new())).unwrap();

    assert!(wait_for_condition(|| async { supervisor.output_closed() }, 2000).await);

    // The read end goes away with the process; the first write after that fails
    let failed = wait_for_condition(
        || async { supervisor.submit("late.mp3").await.is_err() },
        2000,
    )
    .await;
    assert!(failed, "submit kept succeeding after the child exited");
    assert_eq!(supervisor.pipe_state(), PipeState::Closed);
    assert!(matches!(supervisor.submit("later.mp3").await, Err(MixerError::PipeClosed)));
    assert_eq!(supervisor.status().await, "Ready");
}

#[tokio::test]
async fn test_stderr_noise_does_not_reach_status() {
    let supervisor = ProcessSupervisor::start(
        &shell("echo 'decoder warning' 1>&2; echo 'Position: 00:01.00/03:00.00'"),
        Arc::new(StatusCache::new()),
    )
    .unwrap();

    assert!(wait_for_condition(|| async { supervisor.output_closed() }, 2000).await);
    assert_eq!(supervisor.status().await, "Position: 00:01.00/03:00.00");
}

#[tokio::test]
async fn test_non_utf8_output_keeps_child_alive() {
    let supervisor = ProcessSupervisor::start(
        &shell("printf 'Now playing: Caf\\351\\n'; printf 'bad tag \\377\\n' 1>&2; exec cat"),
        Arc::new(StatusCache::new()),
    )
    .unwrap();

    let lossy = wait_for_condition(|| async { supervisor.status().await == "Now playing: Caf\u{FFFD}" }, 2000).await;
    assert!(lossy, "status never showed the lossily decoded title");

    // Both readers are still draining, so cat can echo without a broken pipe
    supervisor.submit("after.mp3").await.unwrap();
    let echoed = wait_for_condition(|| async { supervisor.status().await == "after.mp3" }, 2000).await;
    assert!(echoed, "child stopped echoing after non UTF-8 output");
    assert!(!supervisor.output_closed());
}

#[tokio::test]
async fn test_working_dir_is_applied() {
    let dir = tempfile::TempDir::new().unwrap();
    let expected = dir.path().canonicalize().unwrap();
    let config = shell("pwd -P").with_working_dir(Some(dir.path().to_path_buf()));

    let supervisor = ProcessSupervisor::start(&config, Arc::new(StatusCache::new())).unwrap();

    assert!(wait_for_condition(|| async { supervisor.output_closed() }, 2000).await);
    assert_eq!(supervisor.status().await, expected.display().to_string());
}

#[tokio::test]
async fn test_missing_executable_is_a_startup_failure() {
    let result = ProcessSupervisor::start(
        &PipeConfig::new("/nonexistent/mixing-pipe"),
        Arc::new(StatusCache::new()),
    );

    assert!(matches!(result, Err(MixerError::SpawnFailed { .. })));
}
