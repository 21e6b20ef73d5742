use crate::domain::job::Job;
use crate::error::{BatchError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of the demo input format: a job id plus an optional flag telling
/// the demo processor to fail the job.
#[derive(Debug, Deserialize)]
struct JobRecord {
    id: String,
    #[serde(default)]
    fail: bool,
}

/// Reads jobs from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<Job>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct JobReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> JobReader<R> {
    /// Creates a new `JobReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes jobs, so large
    /// inputs stream through without loading everything up front.
    pub fn jobs(self) -> impl Iterator<Item = Result<Job>> {
        self.reader.into_deserialize().map(|result| {
            result.map_err(BatchError::from).map(|record: JobRecord| {
                Job::with_payload(record.id, serde_json::json!({ "fail": record.fail }))
            })
        })
    }
}
