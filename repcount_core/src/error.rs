use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RepError {
    #[error("pose source error: {0}")]
    Source(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timeout waiting for pose frames")]
    Timeout,
    #[error("invalid state: {0}")]
    State(String),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing joint triple")]
    MissingJoints,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
