//! Declarative access rule fixtures
//!
//! Builds raw (unvalidated) rule input the way a host would hand it over.

use fmc_access_rule::RawConfig;
use serde_json::{json, Value};

/// Builder for raw declarative rule input.
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    fields: RawConfig,
}

impl RuleBuilder {
    /// Starts a rule with its policy and name set.
    pub fn new(acp: &str, name: &str) -> Self {
        Self::empty().with_field("acp", acp).with_field("name", name)
    }

    /// Starts a rule with no fields at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets a field to any JSON value.
    pub fn with_field(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Sets a list field of object identifiers.
    pub fn with_refs(self, field: &str, ids: &[&str]) -> Self {
        self.with_field(field, json!(ids))
    }

    /// Removes a field.
    pub fn without(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    /// Returns the raw input.
    pub fn build(self) -> RawConfig {
        self.fields
    }
}

/// Input of the basic lifecycle scenario: a blocking rule with two source zones.
pub fn end_to_end_input() -> RawConfig {
    RuleBuilder::new("p1", "r1")
        .with_field("action", "block")
        .with_field("enable_syslog", true)
        .with_field("enabled", true)
        .with_refs("source_zones", &["z1", "z2"])
        .build()
}

/// Input with every writable field populated.
pub fn full_rule_input(acp: &str, name: &str) -> RawConfig {
    RuleBuilder::new(acp, name)
        .with_field("action", "ALLOW")
        .with_field("syslog_severity", "warning")
        .with_field("enable_syslog", true)
        .with_field("enabled", true)
        .with_field("send_events_to_fmc", true)
        .with_field("log_files", true)
        .with_field("log_begin", false)
        .with_field("log_end", true)
        .with_refs("source_zones", &["zone-inside"])
        .with_refs("destination_zones", &["zone-outside"])
        .with_refs("source_networks", &["net-a", "net-b"])
        .with_refs("destination_networks", &["net-c"])
        .with_refs("source_ports", &["port-ssh"])
        .with_refs("destination_ports", &["port-https", "port-http"])
        .with_refs("urls", &["url-blocklist"])
        .with_field("ips_policy", "ips-1")
        .with_field("file_policy", "file-1")
        .with_field("syslog_config", "syslog-1")
        .with_refs("comments", &["created by tests"])
        .build()
}

/// Input carrying only the required fields.
pub fn minimal_input(acp: &str, name: &str) -> RawConfig {
    RuleBuilder::new(acp, name)
        .with_field("enable_syslog", false)
        .with_field("enabled", true)
        .build()
}
