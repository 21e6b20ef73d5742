use crate::application::config::BatchConfig;
use crate::domain::job::{Job, Outcome, QueuedJob};
use crate::domain::ports::{BatchProcessorBox, OutcomeFuture};
use crate::error::{BatchError, Result};
use crate::infrastructure::queue::JobQueue;
use futures::FutureExt;
use futures::future::Shared;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// A ledger entry: one dispatched job's outcome, awaitable from multiple
/// places (the result router, `get_results`, the shutdown settle-join).
type SharedOutcome = Shared<OutcomeFuture>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineState {
    Running,
    Terminated,
}

/// The caller's side of one submission.
///
/// `outcome()` always resolves with an `Outcome`; a job that the processor
/// failed still resolves, carrying the failure inside the outcome.
#[derive(Debug)]
pub struct JobHandle {
    job_id: String,
    rx: oneshot::Receiver<Outcome>,
}

impl JobHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Waits for the job's outcome to be routed back.
    ///
    /// If the engine was flushed before the job was ever dispatched, this
    /// resolves with an explicit failure outcome rather than hanging.
    pub async fn outcome(self) -> Outcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::failure(self.job_id, "job was flushed before dispatch"),
        }
    }
}

/// The micro-batching engine.
///
/// Callers submit jobs one at a time; a timer-driven loop periodically
/// drains up to `max_batch_size` of them, in FIFO order, into the injected
/// `BatchProcessor`, and each submitter's handle is resolved as soon as its
/// job's outcome settles.
///
/// The engine is cheap to clone; clones share the same queue, ledger and
/// scheduler, so submissions may come from any number of tasks.
#[derive(Clone)]
pub struct BatchEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: BatchConfig,
    processor: BatchProcessorBox,
    queue: JobQueue,
    /// Append-only within a lifecycle; grows in dispatch order, cleared by
    /// `flush` once everything has settled. Written only by ticks, read by
    /// `get_results` and shutdown, hence the RwLock.
    ledger: RwLock<Vec<SharedOutcome>>,
    /// Submissions awaiting dispatch, keyed by sequence number. Dispatch
    /// moves each sender out to a router task.
    pending: Mutex<HashMap<u64, oneshot::Sender<Outcome>>>,
    /// The dispatch timer task; `Some` while the scheduler is active.
    scheduler: Mutex<Option<JoinHandle<()>>>,
    next_seq: AtomicU64,
    terminated: AtomicBool,
}

impl BatchEngine {
    pub fn new(processor: BatchProcessorBox, config: BatchConfig) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config,
                processor,
                queue: JobQueue::new(),
                ledger: RwLock::new(Vec::new()),
                pending: Mutex::new(HashMap::new()),
                scheduler: Mutex::new(None),
                next_seq: AtomicU64::new(0),
                terminated: AtomicBool::new(false),
            }),
        }
    }

    pub fn state(&self) -> EngineState {
        if self.inner.terminated.load(Ordering::SeqCst) {
            EngineState::Terminated
        } else {
            EngineState::Running
        }
    }

    /// Submits one job for batched processing.
    ///
    /// Fails with `ServiceClosed` after `shutdown` without enqueueing
    /// anything. Otherwise the job is assigned a monotonic sequence number,
    /// appended to the queue, and the dispatch timer is started if this
    /// submission made an empty queue non-empty.
    pub async fn submit_job(&self, job: Job) -> Result<JobHandle> {
        if self.inner.terminated.load(Ordering::SeqCst) {
            return Err(BatchError::ServiceClosed);
        }

        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().await.insert(seq, tx);

        let job_id = job.id.clone();
        let was_empty = self.inner.queue.enqueue(QueuedJob { seq, job }).await;
        debug!(seq, job_id = %job_id, "job accepted");

        if was_empty {
            self.ensure_scheduler().await;
        }

        Ok(JobHandle { job_id, rx })
    }

    /// Waits for every outcome currently in the ledger to settle and returns
    /// them in dispatch order. Never fails, regardless of how many
    /// individual jobs failed.
    pub async fn get_results(&self) -> Vec<Outcome> {
        let snapshot: Vec<SharedOutcome> = self.inner.ledger.read().await.clone();
        futures::future::join_all(snapshot).await
    }

    /// Shuts the engine down: rejects new submissions, drains every queued
    /// job into the processor bypassing the timer, waits for all outcomes to
    /// settle, then flushes. The settled ledger is returned, since the flush
    /// empties it. Safe to call more than once; a second call finds nothing
    /// to drain and returns an empty snapshot.
    pub async fn shutdown(&self) -> Vec<Outcome> {
        if !self.inner.terminated.swap(true, Ordering::SeqCst) {
            info!("shutting down, draining queued jobs");
        }

        // Drive batches directly; the timer retires itself on its next
        // empty tick.
        while self.inner.run_batch().await > 0 {}

        let settled = self.get_results().await;
        let failures = settled.iter().filter(|o| !o.is_success()).count();
        debug!(outcomes = settled.len(), failures, "drain settled");

        self.flush().await;
        settled
    }

    /// Clears the queue, the ledger and any unrouted submissions. Called by
    /// `shutdown` once every outcome has settled; a handle whose job is
    /// flushed before dispatch resolves with an explicit failure outcome.
    pub async fn flush(&self) {
        self.inner.queue.reset().await;
        self.inner.ledger.write().await.clear();
        self.inner.pending.lock().await.clear();
    }

    /// Whether the dispatch timer is currently running.
    pub async fn is_active(&self) -> bool {
        self.inner.scheduler.lock().await.is_some()
    }

    /// Number of jobs accepted but not yet dispatched.
    pub async fn queued_jobs(&self) -> usize {
        self.inner.queue.len().await
    }

    /// Starts the dispatch timer unless it is already running.
    async fn ensure_scheduler(&self) {
        let mut slot = self.inner.scheduler.lock().await;
        if slot.is_some() {
            return;
        }

        debug!(
            interval_ms = self.inner.config.batch_interval.as_millis() as u64,
            "dispatch timer started"
        );
        let inner = Arc::clone(&self.inner);
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.config.batch_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of an interval completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if inner.run_batch().await == 0 {
                    let mut slot = inner.scheduler.lock().await;
                    // a submission may have raced the empty drain; if so,
                    // keep the timer alive instead of retiring it
                    if inner.queue.is_empty().await {
                        slot.take();
                        debug!("dispatch timer retired on empty tick");
                        return;
                    }
                }
            }
        }));
    }
}

impl EngineInner {
    /// One batch-formation pass: drains up to `max_batch_size` jobs, hands
    /// them to the processor as one ordered group, appends the returned
    /// handles to the ledger in group order, and wires each submitter's
    /// router. This is the only place jobs leave the queue and the only
    /// place the ledger grows.
    ///
    /// Returns the number of jobs dispatched; zero means the queue was
    /// empty.
    async fn run_batch(&self) -> usize {
        let group = self.queue.drain_batch(self.config.max_batch_size).await;
        if group.is_empty() {
            return 0;
        }

        let jobs: Vec<Job> = group.iter().map(|q| q.job.clone()).collect();
        let dispatched = jobs.len();
        debug!(dispatched, "dispatching batch");

        let handles = self.processor.process_jobs(jobs).await;
        if handles.len() != group.len() {
            // Contract violation: one outcome handle per job, same order.
            // Jobs left uncovered settle with an explicit failure below;
            // surplus handles are dropped.
            error!(
                expected = group.len(),
                returned = handles.len(),
                "processor returned a mismatched outcome count"
            );
        }

        let mut handles = handles.into_iter();
        let mut ledger = self.ledger.write().await;
        let mut pending = self.pending.lock().await;
        for queued in group {
            let shared: SharedOutcome = match handles.next() {
                Some(handle) => handle.shared(),
                None => {
                    let outcome =
                        Outcome::failure(&queued.job.id, "processor returned no outcome");
                    let ready: OutcomeFuture = futures::future::ready(outcome).boxed();
                    ready.shared()
                }
            };
            ledger.push(shared.clone());
            if let Some(tx) = pending.remove(&queued.seq) {
                // push-based delivery: resolve the submitter as soon as the
                // handle settles
                tokio::spawn(async move {
                    let _ = tx.send(shared.await);
                });
            }
        }

        dispatched
    }
}
