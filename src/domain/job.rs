use serde::{Deserialize, Serialize};

/// A unit of work submitted to the engine.
///
/// The `payload` is opaque to the engine: it is carried to the processor
/// untouched, and only the processor assigns meaning to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// The result of processing one job.
///
/// Job-level failure is data, not an error: a failed job still settles its
/// submitter's future with an `Outcome` whose status is `Failure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub job_id: String,
    pub status: OutcomeStatus,
    pub detail: Option<String>,
}

impl Outcome {
    pub fn success(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: OutcomeStatus::Success,
            detail: None,
        }
    }

    pub fn failure(job_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: OutcomeStatus::Failure,
            detail: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// A job annotated with the monotonic sequence number assigned at submission.
///
/// The sequence number travels with the job from enqueue through dispatch,
/// so result delivery is keyed by identity rather than by the job's position
/// in the queue at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedJob {
    pub seq: u64,
    pub job: Job,
}
