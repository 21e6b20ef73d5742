//! Application layer containing the batching engine itself.
//!
//! This module defines the `BatchEngine`, the primary entry point for
//! submitting jobs. It owns the job queue and the results ledger, runs the
//! timer-driven dispatch loop, and routes every processed outcome back to
//! its original submitter.

pub mod config;
pub mod engine;
