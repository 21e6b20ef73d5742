use crate::domain::job::{Job, Outcome};
use crate::domain::ports::{BatchProcessor, OutcomeFuture};
use async_trait::async_trait;
use futures::FutureExt;
use std::time::Duration;

/// A processor that derives each job's outcome from a closure.
///
/// With a latency configured, each outcome handle settles only after that
/// delay, which exercises the engine's asynchronous settlement path the same
/// way a remote backend would.
pub struct FnProcessor<F> {
    f: F,
    latency: Option<Duration>,
}

impl<F> FnProcessor<F>
where
    F: Fn(&Job) -> Outcome + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f, latency: None }
    }

    pub fn with_latency(f: F, latency: Duration) -> Self {
        Self {
            f,
            latency: Some(latency),
        }
    }
}

#[async_trait]
impl<F> BatchProcessor for FnProcessor<F>
where
    F: Fn(&Job) -> Outcome + Send + Sync,
{
    async fn process_jobs(&self, jobs: Vec<Job>) -> Vec<OutcomeFuture> {
        jobs.iter()
            .map(|job| {
                let outcome = (self.f)(job);
                match self.latency {
                    Some(latency) => async move {
                        tokio::time::sleep(latency).await;
                        outcome
                    }
                    .boxed(),
                    None => futures::future::ready(outcome).boxed(),
                }
            })
            .collect()
    }
}

/// The processor used by the demo binary: a job fails when its payload
/// carries `"fail": true`, and succeeds otherwise.
pub fn payload_flag_processor() -> FnProcessor<impl Fn(&Job) -> Outcome + Send + Sync> {
    FnProcessor::new(|job: &Job| {
        if job.payload.get("fail").and_then(|v| v.as_bool()) == Some(true) {
            Outcome::failure(&job.id, "job flagged to fail")
        } else {
            Outcome::success(&job.id)
        }
    })
}
