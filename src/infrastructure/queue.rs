use crate::domain::job::QueuedJob;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// A strict-FIFO queue of pending jobs.
///
/// Every mutation runs under a single async mutex, so interleaved concurrent
/// callers see each operation as atomic even across suspension points. The
/// mutex also serves submitters in registration order, which keeps enqueue
/// order matching submission order under contention.
#[derive(Default)]
pub struct JobQueue {
    inner: Mutex<VecDeque<QueuedJob>>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a job at the tail.
    ///
    /// Returns `true` when the queue was empty before the append, i.e. this
    /// enqueue is the empty→non-empty transition that must start the
    /// dispatch timer.
    pub async fn enqueue(&self, job: QueuedJob) -> bool {
        let mut queue = self.inner.lock().await;
        let was_empty = queue.is_empty();
        queue.push_back(job);
        was_empty
    }

    /// Removes and returns the oldest still-enqueued job, if any.
    pub async fn dequeue(&self) -> Option<QueuedJob> {
        self.inner.lock().await.pop_front()
    }

    /// Removes up to `max` jobs from the head, preserving FIFO order.
    ///
    /// The whole group leaves the queue under one lock acquisition, so no
    /// concurrent submitter can interleave into the middle of a batch.
    pub async fn drain_batch(&self, max: usize) -> Vec<QueuedJob> {
        let mut queue = self.inner.lock().await;
        let len = queue.len().min(max);
        queue.drain(..len).collect()
    }

    /// Clears all contents.
    pub async fn reset(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
