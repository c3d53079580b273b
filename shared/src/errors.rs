//! Shared error types for the failover test harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Failed to decode {record} from {path}: {message}")]
    Decode {
        record: &'static str,
        path: String,
        message: String,
    },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
