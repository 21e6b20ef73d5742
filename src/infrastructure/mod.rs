pub mod processor;
pub mod queue;
