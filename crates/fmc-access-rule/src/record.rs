//! Declarative (caller-facing) access rule record.

use serde::{Deserialize, Serialize};

use crate::types::{RuleAction, SyslogSeverity};

/// The identifier-centric view of an access rule held by the host.
///
/// References are plain identifiers; the descriptive attributes FMC returns
/// are never stored here. Field names are the stable host-facing surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessRuleRecord {
    /// Owning access control policy. Changing it forces replacement.
    pub acp: String,
    pub name: String,
    /// Discriminator reported by FMC (read-only).
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_severity: Option<SyslogSeverity>,
    pub enable_syslog: bool,
    pub enabled: bool,
    pub send_events_to_fmc: bool,
    pub log_files: bool,
    pub log_begin: bool,
    pub log_end: bool,

    pub source_zones: Vec<String>,
    pub destination_zones: Vec<String>,
    pub source_networks: Vec<String>,
    pub destination_networks: Vec<String>,
    pub source_ports: Vec<String>,
    pub destination_ports: Vec<String>,
    pub urls: Vec<String>,

    pub ips_policy: String,
    pub file_policy: String,
    pub syslog_config: String,

    /// Comments appended on create (write-only).
    pub comments: Vec<String>,
}

impl AccessRuleRecord {
    /// Creates a record with the given policy and name; everything else empty.
    pub fn new(acp: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            acp: acp.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_field_names() {
        let mut record = AccessRuleRecord::new("p1", "r1");
        record.action = Some(RuleAction::Trust);
        record.rule_type = "AccessRule".to_string();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["acp"], "p1");
        assert_eq!(value["type"], "AccessRule");
        assert_eq!(value["action"], "TRUST");
        assert_eq!(value["send_events_to_fmc"], false);
        assert_eq!(value["source_zones"], json!([]));
        assert!(value.get("syslog_severity").is_none());
    }

    #[test]
    fn test_state_deserialize_partial() {
        let record: AccessRuleRecord =
            serde_json::from_value(json!({ "acp": "p1", "name": "r1", "urls": ["u1"] })).unwrap();
        assert_eq!(record.urls, vec!["u1"]);
        assert!(record.source_zones.is_empty());
        assert_eq!(record.action, None);
    }
}
