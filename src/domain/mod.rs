pub mod job;
pub mod ports;
