//! Runtime Management
//!
//! Metadata reads, container resolution, topology discovery, fault injection
//! and cleanup, all driven through a shared [`HarnessContext`].

pub mod cleanup;
pub mod context;
pub mod fault_injector;
pub mod metadata;
pub mod registry;
pub mod retry;
pub mod topology;

// Re-export main types
pub use cleanup::CleanupManager;
pub use context::HarnessContext;
pub use fault_injector::{FaultInjector, FaultTarget, InjectionEvent, LeaderFault};
pub use metadata::{MetadataClient, QueryMode};
pub use registry::ContainerRegistry;
pub use retry::{PollOutcome, RetryPolicy};
pub use topology::TopologyDiscovery;
