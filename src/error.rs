use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("micro-batch service is closed")]
    ServiceClosed,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BatchError>;
