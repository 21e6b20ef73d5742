pub mod job_reader;
pub mod outcome_writer;
