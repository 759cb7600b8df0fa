//! Common resource lifecycle abstractions for FMC policy objects.
//!
//! This crate provides the traits and types shared by every resource that a
//! declarative host synchronizes with a Firepower Management Center:
//!
//! - [`Resource`]: create/read/update/delete contract invoked by the host
//! - [`ResourceData`]: observed-state sink holding the remote identifier
//! - [`Diagnostics`]: uniform error/warning result of every operation
//! - [`PlannedChange`]: in-place update vs. replacement classification
//! - [`FmcError`]: error type for lifecycle failures
//!
//! # Architecture
//!
//! ```text
//! declarative host
//!        │ create / read / update / delete
//!        ▼
//!    Resource impl ──> remote policy client ──> FMC REST API
//!        │
//!        ▼
//!    ResourceData (id + observed record) + Diagnostics
//! ```

mod diag;
pub mod error;
mod resource;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{FmcError, FmcResult};
pub use resource::{LifecycleState, PlannedChange, Resource, ResourceData, SessionContext};
