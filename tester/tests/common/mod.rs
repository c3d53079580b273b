//! Common test utilities and infrastructure
//!
//! Shared fixtures and a context builder used across the harness test suites.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::ContextBuilder;
