use microbatch::application::config::BatchConfig;
use microbatch::application::engine::{BatchEngine, EngineState};
use microbatch::domain::job::{Job, Outcome};
use microbatch::error::BatchError;
use microbatch::infrastructure::processor::FnProcessor;
use std::time::Duration;

fn quiet_engine() -> BatchEngine {
    // an interval long enough that only shutdown's drain ever dispatches
    let processor = FnProcessor::new(|job: &Job| Outcome::success(&job.id));
    let config = BatchConfig::new(3, Duration::from_secs(3600)).unwrap();
    BatchEngine::new(Box::new(processor), config)
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_drains_then_rejects_later_submissions() {
    let engine = quiet_engine();

    let mut accepted = Vec::new();
    for i in 0..3 {
        accepted.push(engine.submit_job(Job::new(i.to_string())).await.unwrap());
    }

    let settled = engine.shutdown().await;
    assert_eq!(settled.len(), 3);
    assert!(settled.iter().all(Outcome::is_success));

    for handle in accepted {
        assert!(handle.outcome().await.is_success());
    }

    // late submissions are rejected without ever touching the queue
    for i in 3..6 {
        let err = engine.submit_job(Job::new(i.to_string())).await.unwrap_err();
        assert!(matches!(err, BatchError::ServiceClosed));
    }
    assert_eq!(engine.queued_jobs().await, 0);
    assert!(engine.get_results().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_dispatches_in_bounded_groups() {
    let engine = quiet_engine();

    let mut handles = Vec::new();
    for i in 0..8 {
        handles.push(engine.submit_job(Job::new(i.to_string())).await.unwrap());
    }

    // 8 jobs at max_batch_size 3: the drain needs three passes
    let settled = engine.shutdown().await;
    assert_eq!(settled.len(), 8);

    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.outcome().await;
        assert_eq!(outcome.job_id, i.to_string());
    }
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_is_idempotent() {
    let engine = quiet_engine();
    engine.submit_job(Job::new("only")).await.unwrap();

    let first = engine.shutdown().await;
    assert_eq!(first.len(), 1);

    let second = engine.shutdown().await;
    assert!(second.is_empty());
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_waits_for_slow_settlement() {
    let processor = FnProcessor::with_latency(
        |job: &Job| {
            if job.id == "bad" {
                Outcome::failure(&job.id, "backend rejected")
            } else {
                Outcome::success(&job.id)
            }
        },
        Duration::from_millis(250),
    );
    let config = BatchConfig::new(10, Duration::from_secs(3600)).unwrap();
    let engine = BatchEngine::new(Box::new(processor), config);

    engine.submit_job(Job::new("good")).await.unwrap();
    engine.submit_job(Job::new("bad")).await.unwrap();

    // the all-settled join absorbs processor latency and job failures alike
    let settled = engine.shutdown().await;
    assert_eq!(settled.len(), 2);
    assert!(settled[0].is_success());
    assert!(!settled[1].is_success());
    assert_eq!(settled[1].detail.as_deref(), Some("backend rejected"));
}

#[tokio::test(start_paused = true)]
async fn test_flush_resolves_undispatched_handles_with_failure() {
    let engine = quiet_engine();

    let handle = engine.submit_job(Job::new("orphan")).await.unwrap();
    // flushing without draining abandons the queued job
    engine.flush().await;

    let outcome = handle.outcome().await;
    assert!(!outcome.is_success());
    assert_eq!(outcome.job_id, "orphan");
}
