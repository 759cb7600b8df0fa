//! Remote (FMC REST) representation of an access rule.
//!
//! Field names follow the FMC JSON API. Reference collections are wrapped
//! in an `objects` container; absent containers deserialize as empty.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::types::{InvalidEnumValue, RuleAction, SyslogSeverity};

/// Pointer-by-identifier to another FMC object.
///
/// Writes carry only the identifier. Reads may additionally return
/// descriptive attributes, which the declarative record discards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ObjectReference {
    /// Creates a minimal reference holding only the identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: None,
        }
    }

    /// Returns true if the reference explicitly points at nothing.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Ordered collection of references (`{"objects": [...]}` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReferences {
    #[serde(default)]
    pub objects: Vec<ObjectReference>,
}

impl ObjectReferences {
    /// Builds id-only references, preserving order and duplicates.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        Self {
            objects: ids
                .iter()
                .map(|id| ObjectReference::new(id.as_ref()))
                .collect(),
        }
    }

    /// Collapses the references back to their identifiers.
    pub fn ids(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// An access rule as exchanged with FMC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    /// Assigned by FMC on creation; absent in create bodies.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Discriminator tag.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "reported_enum"
    )]
    pub action: Option<RuleAction>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "reported_enum"
    )]
    pub syslog_severity: Option<SyslogSeverity>,
    #[serde(default)]
    pub enable_syslog: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "sendEventsToFMC", default)]
    pub send_events_to_fmc: bool,
    #[serde(default)]
    pub log_files: bool,
    #[serde(default)]
    pub log_begin: bool,
    #[serde(default)]
    pub log_end: bool,

    #[serde(default)]
    pub source_zones: ObjectReferences,
    #[serde(default)]
    pub destination_zones: ObjectReferences,
    #[serde(default)]
    pub source_networks: ObjectReferences,
    #[serde(default)]
    pub destination_networks: ObjectReferences,
    #[serde(default)]
    pub source_ports: ObjectReferences,
    #[serde(default)]
    pub destination_ports: ObjectReferences,
    #[serde(default)]
    pub urls: ObjectReferences,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips_policy: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_policy: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_config: Option<ObjectReference>,

    /// Comments to append; accepted on create, never returned.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_comments: Vec<String>,
}

/// Reads an enumerated value reported by FMC.
///
/// Any case is accepted. Empty or unrecognized values read as unset, so a
/// rule carrying a value this crate does not know still decodes.
fn reported_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = InvalidEnumValue>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse() {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(error = %err, "Ignoring unrecognized value reported by FMC");
            Ok(None)
        }
    }
}
