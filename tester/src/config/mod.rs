//! Configuration Management
//!
//! Session-wide settings, per-scenario configuration and fault strategies.

pub mod builder;
pub mod fault;
pub mod scenario;
pub mod session;

// Re-export main types
pub use builder::ScenarioConfigBuilder;
pub use fault::{FaultStrategy, SurvivorSelection};
pub use scenario::{ScenarioConfig, Timings};
pub use session::{COMPOSE_PROJECT_LABEL, HarnessSession};
