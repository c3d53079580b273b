//! Shared types for the Kafka failover test harness
//!
//! Broker, partition and container value types plus logging setup used by
//! every harness component.

pub mod types;
pub mod errors;
pub mod logging;

pub use types::*;
pub use errors::*;
