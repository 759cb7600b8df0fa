//! FMC access rule resource.
//!
//! Synchronizes a declarative access rule with its representation in an
//! access control policy (ACP) on a Firepower Management Center.
//!
//! # Architecture
//!
//! ```text
//! raw declarative input
//!        │
//!        ▼
//!    schema::validate ──> AccessRuleRecord
//!        │
//!        ▼
//!    codec::encode ──> AccessRule (wire) ──> AccessRuleClient ──> FMC
//!                                                 │
//!    codec::decode_into <── AccessRule (wire) <───┘
//!        │
//!        ▼
//!    ResourceData (id + observed record)
//! ```
//!
//! # Key Components
//!
//! - [`AccessRuleRecord`]: identifier-centric declarative record
//! - [`AccessRule`]: FMC wire shape with nested object references
//! - [`AccessRuleResource`]: lifecycle orchestrator (create/read/delete;
//!   update is refused)
//! - [`AccessRuleClient`]: remote policy client contract

pub mod client;
pub mod codec;
pub mod document;
pub mod fields;
mod orch;
pub mod record;
pub mod schema;
pub mod types;
pub mod wire;

pub use client::{AccessRuleClient, ClientError, ClientResult};
pub use codec::{decode, decode_into, encode, ACCESS_RULE_TYPE};
pub use orch::{AccessRuleResource, AccessRuleResourceConfig, MissingRulePolicy};
pub use record::AccessRuleRecord;
pub use schema::{plan_change, validate, RawConfig, SchemaError, SchemaErrors};
pub use types::{InvalidEnumValue, RuleAction, SyslogSeverity};
pub use wire::{AccessRule, ObjectReference, ObjectReferences};
