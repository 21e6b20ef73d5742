use super::job::{Job, Outcome};
use async_trait::async_trait;
use futures::future::BoxFuture;

/// A handle to the eventual outcome of one dispatched job.
pub type OutcomeFuture = BoxFuture<'static, Outcome>;

/// The injected work-processing capability.
///
/// Given an ordered group of jobs, the processor returns one outcome handle
/// per job, in the same order. Individual job failure is represented by the
/// handle settling to a failure `Outcome`, never by a group-level error.
#[async_trait]
pub trait BatchProcessor: Send + Sync {
    async fn process_jobs(&self, jobs: Vec<Job>) -> Vec<OutcomeFuture>;
}

pub type BatchProcessorBox = Box<dyn BatchProcessor>;
