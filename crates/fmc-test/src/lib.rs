//! Integration test infrastructure for FMC resources
//!
//! Provides:
//! - An in-memory FMC standing in for the remote policy client
//! - Declarative rule fixtures
//! - Verification helpers for remote state

pub mod fixtures;
mod memory_client;
mod verification;

pub use fixtures::*;
pub use memory_client::{MemoryAccessRuleClient, Operation, RecordedCall};
pub use verification::*;
