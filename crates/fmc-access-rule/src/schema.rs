//! Declarative schema and validation for access rules.
//!
//! The schema is a static table of [`FieldSchema`] entries. [`validate`]
//! checks a raw declarative input against it (types, required fields,
//! enumerations) and produces a normalized [`AccessRuleRecord`].
//! [`plan_change`] uses the same table to decide whether a difference
//! between two records can be applied in place or forces replacement.

use std::fmt;

use fmc_orch_common::{Diagnostic, Diagnostics, FmcError, FmcResult, PlannedChange};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::codec::{REFERENCE_LIST_FIELDS, SINGULAR_REFERENCE_FIELDS};
use crate::fields;
use crate::record::AccessRuleRecord;
use crate::types::{InvalidEnumValue, RuleAction, SyslogSeverity};

use FieldKind::{Bool, StringList};
use Presence::{Computed, Optional, Required};

/// Raw declarative input: field name → JSON value. `null` means unset.
pub type RawConfig = Map<String, Value>;

/// Value type of a declarative field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Bool,
    StringList,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::StringList => write!(f, "list of strings"),
        }
    }
}

/// Whether a field must, may, or must not be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Required,
    Optional,
    /// Set from the remote object only.
    Computed,
}

/// Schema entry for one declarative field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    /// A change after creation requires destroy and recreate.
    pub force_new: bool,
    /// Sent on create, never read back.
    pub write_only: bool,
}

impl FieldSchema {
    const fn new(name: &'static str, kind: FieldKind, presence: Presence) -> Self {
        Self {
            name,
            kind,
            presence,
            force_new: false,
            write_only: false,
        }
    }

    const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    const fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// Returns true if differences in this field are meaningful for planning.
    pub fn is_compared(&self) -> bool {
        self.presence != Presence::Computed && !self.write_only
    }
}

/// The access rule schema.
pub static ACCESS_RULE_SCHEMA: [FieldSchema; 22] = [
    FieldSchema::new(fields::ACP, FieldKind::String, Required).force_new(),
    FieldSchema::new(fields::NAME, FieldKind::String, Required),
    FieldSchema::new(fields::TYPE, FieldKind::String, Computed),
    FieldSchema::new(fields::ACTION, FieldKind::String, Optional),
    FieldSchema::new(fields::SYSLOG_SEVERITY, FieldKind::String, Optional),
    FieldSchema::new(fields::ENABLE_SYSLOG, Bool, Required),
    FieldSchema::new(fields::ENABLED, Bool, Required),
    FieldSchema::new(fields::SEND_EVENTS_TO_FMC, Bool, Optional),
    FieldSchema::new(fields::LOG_FILES, Bool, Optional),
    FieldSchema::new(fields::LOG_BEGIN, Bool, Optional),
    FieldSchema::new(fields::LOG_END, Bool, Optional),
    FieldSchema::new(fields::SOURCE_ZONES, StringList, Optional),
    FieldSchema::new(fields::DESTINATION_ZONES, StringList, Optional),
    FieldSchema::new(fields::SOURCE_NETWORKS, StringList, Optional),
    FieldSchema::new(fields::DESTINATION_NETWORKS, StringList, Optional),
    FieldSchema::new(fields::SOURCE_PORTS, StringList, Optional),
    FieldSchema::new(fields::DESTINATION_PORTS, StringList, Optional),
    FieldSchema::new(fields::URLS, StringList, Optional),
    FieldSchema::new(fields::IPS_POLICY, FieldKind::String, Optional),
    FieldSchema::new(fields::FILE_POLICY, FieldKind::String, Optional),
    FieldSchema::new(fields::SYSLOG_CONFIG, FieldKind::String, Optional),
    FieldSchema::new(fields::COMMENTS, StringList, Optional).write_only(),
];

/// Looks up a field's schema entry by name.
pub fn field_schema(name: &str) -> Option<&'static FieldSchema> {
    ACCESS_RULE_SCHEMA.iter().find(|f| f.name == name)
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Required field absent or null.
    #[error("{field:?} is required")]
    MissingRequired { field: String },

    /// Value of the wrong JSON type.
    #[error("{field:?} must be a {expected}, got: {found}")]
    WrongType {
        field: String,
        expected: FieldKind,
        found: String,
    },

    /// Value outside an enumerated set.
    #[error(transparent)]
    InvalidEnum(#[from] InvalidEnumValue),

    /// Field not part of the schema.
    #[error("unsupported field {field:?}")]
    UnknownField { field: String },

    /// Value supplied for a field only the remote side may set.
    #[error("{field:?} is computed and cannot be set")]
    ComputedField { field: String },
}

impl SchemaError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field }
            | Self::WrongType { field, .. }
            | Self::UnknownField { field }
            | Self::ComputedField { field } => field,
            Self::InvalidEnum(err) => err.field,
        }
    }
}

/// All validation failures for one input, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct SchemaErrors(pub Vec<SchemaError>);

impl SchemaErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, SchemaError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts to one error diagnostic per failure.
    pub fn to_diagnostics(&self, summary: &str) -> Diagnostics {
        self.0
            .iter()
            .map(|err| Diagnostic::from_error(summary, err))
            .collect()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "list".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// Typed accessor over a raw input that records failures instead of
/// stopping at the first one.
struct Checker<'a> {
    raw: &'a RawConfig,
    errors: Vec<SchemaError>,
}

impl<'a> Checker<'a> {
    fn value(&mut self, schema: &FieldSchema) -> Option<&'a Value> {
        match self.raw.get(schema.name) {
            Some(Value::Null) | None => {
                if schema.presence == Required {
                    self.errors.push(SchemaError::MissingRequired {
                        field: schema.name.to_string(),
                    });
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    fn wrong_type(&mut self, field: impl Into<String>, expected: FieldKind, found: &Value) {
        self.errors.push(SchemaError::WrongType {
            field: field.into(),
            expected,
            found: describe(found),
        });
    }

    fn string(&mut self, schema: &FieldSchema) -> Option<String> {
        match self.value(schema)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.wrong_type(schema.name, FieldKind::String, other);
                None
            }
        }
    }

    fn bool(&mut self, schema: &FieldSchema) -> Option<bool> {
        match self.value(schema)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.wrong_type(schema.name, Bool, other);
                None
            }
        }
    }

    fn string_list(&mut self, schema: &FieldSchema) -> Option<Vec<String>> {
        let items = match self.value(schema)? {
            Value::Array(items) => items,
            other => {
                self.wrong_type(schema.name, StringList, other);
                return None;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (idx, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => {
                    self.wrong_type(format!("{}[{}]", schema.name, idx), FieldKind::String, other);
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    fn enumerated<T>(&mut self, schema: &FieldSchema) -> Option<T>
    where
        T: std::str::FromStr<Err = InvalidEnumValue>,
    {
        let value = self.string(schema)?;
        match value.parse::<T>() {
            Ok(v) => Some(v),
            Err(err) => {
                self.errors.push(err.into());
                None
            }
        }
    }
}

/// Validates a raw declarative input.
///
/// On success the returned record is normalized: `action` and
/// `syslog_severity` are parsed case-insensitively and held in canonical
/// form, absent lists are empty, absent references are empty identifiers.
/// On failure every offending field is reported, in schema order.
pub fn validate(raw: &RawConfig) -> Result<AccessRuleRecord, SchemaErrors> {
    let mut c = Checker {
        raw,
        errors: Vec::new(),
    };

    for key in raw.keys() {
        match field_schema(key) {
            None => c.errors.push(SchemaError::UnknownField { field: key.clone() }),
            Some(schema) if schema.presence == Computed && !raw[key].is_null() => {
                c.errors.push(SchemaError::ComputedField { field: key.clone() })
            }
            Some(_) => {}
        }
    }

    let mut record = AccessRuleRecord::default();
    for schema in &ACCESS_RULE_SCHEMA {
        let r = &mut record;
        match schema.name {
            fields::ACP => r.acp = c.string(schema).unwrap_or_default(),
            fields::NAME => r.name = c.string(schema).unwrap_or_default(),
            fields::TYPE => {}
            fields::ACTION => r.action = c.enumerated::<RuleAction>(schema),
            fields::SYSLOG_SEVERITY => r.syslog_severity = c.enumerated::<SyslogSeverity>(schema),
            fields::ENABLE_SYSLOG => r.enable_syslog = c.bool(schema).unwrap_or_default(),
            fields::ENABLED => r.enabled = c.bool(schema).unwrap_or_default(),
            fields::SEND_EVENTS_TO_FMC => r.send_events_to_fmc = c.bool(schema).unwrap_or_default(),
            fields::LOG_FILES => r.log_files = c.bool(schema).unwrap_or_default(),
            fields::LOG_BEGIN => r.log_begin = c.bool(schema).unwrap_or_default(),
            fields::LOG_END => r.log_end = c.bool(schema).unwrap_or_default(),
            fields::COMMENTS => r.comments = c.string_list(schema).unwrap_or_default(),
            name => {
                if let Some(list) = REFERENCE_LIST_FIELDS.iter().find(|f| f.name == name) {
                    *(list.record_mut)(r) = c.string_list(schema).unwrap_or_default();
                } else if let Some(single) = SINGULAR_REFERENCE_FIELDS.iter().find(|f| f.name == name) {
                    *(single.record_mut)(r) = c.string(schema).unwrap_or_default();
                }
            }
        }
    }

    if c.errors.is_empty() {
        Ok(record)
    } else {
        Err(SchemaErrors(c.errors))
    }
}

/// Classifies the difference between a prior (observed) and a desired record.
///
/// Computed and write-only fields are ignored. If any changed field is
/// ForceNew the change is a replacement; otherwise it is an update.
pub fn plan_change(prior: &AccessRuleRecord, desired: &AccessRuleRecord) -> FmcResult<PlannedChange> {
    let prior = to_object(prior)?;
    let desired = to_object(desired)?;

    let changed: Vec<&FieldSchema> = ACCESS_RULE_SCHEMA
        .iter()
        .filter(|f| f.is_compared())
        .filter(|f| prior.get(f.name) != desired.get(f.name))
        .collect();

    if changed.is_empty() {
        return Ok(PlannedChange::NoOp);
    }

    let replace: Vec<String> = changed
        .iter()
        .filter(|f| f.force_new)
        .map(|f| f.name.to_string())
        .collect();

    if replace.is_empty() {
        Ok(PlannedChange::Update {
            fields: changed.iter().map(|f| f.name.to_string()).collect(),
        })
    } else {
        Ok(PlannedChange::Replace { fields: replace })
    }
}

fn to_object(record: &AccessRuleRecord) -> FmcResult<RawConfig> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(FmcError::internal(format!(
            "access rule record serialized to {}",
            describe(&other)
        ))),
        Err(e) => Err(FmcError::internal(format!(
            "failed to serialize access rule record: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawConfig {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn minimal() -> Value {
        json!({ "acp": "p1", "name": "r1", "enable_syslog": false, "enabled": true })
    }

    #[test]
    fn test_schema_covers_every_record_field() {
        let record = to_object(&AccessRuleRecord::default()).unwrap();
        for key in record.keys() {
            assert!(field_schema(key).is_some(), "{} missing from schema", key);
        }
        // action and syslog_severity are skipped when unset
        assert_eq!(ACCESS_RULE_SCHEMA.len(), record.len() + 2);
    }

    #[test]
    fn test_only_acp_forces_replacement() {
        let force_new: Vec<_> = ACCESS_RULE_SCHEMA
            .iter()
            .filter(|f| f.force_new)
            .map(|f| f.name)
            .collect();
        assert_eq!(force_new, vec!["acp"]);
        assert!(field_schema("comments").is_some_and(|f| f.write_only));
        assert!(field_schema("type").is_some_and(|f| !f.is_compared()));
    }

    #[test]
    fn test_validate_minimal() {
        let record = validate(&raw(minimal())).unwrap();
        assert_eq!(record.acp, "p1");
        assert_eq!(record.name, "r1");
        assert!(record.enabled);
        assert!(!record.enable_syslog);
        assert_eq!(record.action, None);
        assert!(record.source_zones.is_empty());
        assert_eq!(record.ips_policy, "");
    }

    #[test]
    fn test_validate_normalizes_enums() {
        for action in ["block", "Block", "BLOCK"] {
            let mut input = minimal();
            input["action"] = json!(action);
            input["syslog_severity"] = json!("warning");
            let record = validate(&raw(input)).unwrap();
            assert_eq!(record.action, Some(RuleAction::Block));
            assert_eq!(record.syslog_severity, Some(SyslogSeverity::Warning));
        }
    }

    #[test]
    fn test_validate_rejects_unknown_action() {
        let mut input = minimal();
        input["action"] = json!("permit");
        let errs = validate(&raw(input)).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.0[0].field(), "action");
        assert!(errs.to_string().contains("got: \"PERMIT\""));
        assert!(errs.to_string().contains("ALLOW TRUST BLOCK"));
    }

    #[test]
    fn test_validate_reports_all_missing_required() {
        let errs = validate(&raw(json!({ "name": null }))).unwrap_err();
        let fields: Vec<_> = errs.iter().map(SchemaError::field).collect();
        assert_eq!(fields, vec!["acp", "name", "enable_syslog", "enabled"]);
    }

    #[test]
    fn test_validate_type_errors() {
        let mut input = minimal();
        input["enabled"] = json!("yes");
        input["source_zones"] = json!(["z1", 7]);
        input["urls"] = json!("u1");
        let errs = validate(&raw(input)).unwrap_err();
        assert_eq!(
            errs.0,
            vec![
                SchemaError::WrongType {
                    field: "enabled".to_string(),
                    expected: Bool,
                    found: "string \"yes\"".to_string(),
                },
                SchemaError::WrongType {
                    field: "source_zones[1]".to_string(),
                    expected: FieldKind::String,
                    found: "number 7".to_string(),
                },
                SchemaError::WrongType {
                    field: "urls".to_string(),
                    expected: StringList,
                    found: "string \"u1\"".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_validate_unknown_and_computed_fields() {
        let mut input = minimal();
        input["type"] = json!("AccessRule");
        input["priority"] = json!(1);
        let errs = validate(&raw(input)).unwrap_err();
        let fields: Vec<_> = errs.iter().map(SchemaError::field).collect();
        assert_eq!(fields, vec!["priority", "type"]);

        let diags = errs.to_diagnostics(fields::DIAG_SUMMARY);
        assert_eq!(diags.len(), 2);
        assert!(diags.has_error());
    }

    #[test]
    fn test_validate_keeps_list_order_and_duplicates() {
        let mut input = minimal();
        input["destination_ports"] = json!(["443", "80", "443"]);
        input["comments"] = json!(["first", "second"]);
        let record = validate(&raw(input)).unwrap();
        assert_eq!(record.destination_ports, vec!["443", "80", "443"]);
        assert_eq!(record.comments, vec!["first", "second"]);
    }

    #[test]
    fn test_plan_acp_change_requires_replace() {
        let prior = validate(&raw(minimal())).unwrap();
        let mut desired = prior.clone();
        desired.acp = "p2".to_string();
        desired.name = "r2".to_string();

        let change = plan_change(&prior, &desired).unwrap();
        assert!(change.requires_replace());
        assert_eq!(
            change,
            PlannedChange::Replace {
                fields: vec!["acp".to_string()]
            }
        );
    }

    #[test]
    fn test_plan_in_place_update() {
        let prior = validate(&raw(minimal())).unwrap();
        let mut desired = prior.clone();
        desired.enabled = false;
        desired.urls = vec!["u1".to_string()];

        assert_eq!(
            plan_change(&prior, &desired).unwrap(),
            PlannedChange::Update {
                fields: vec!["enabled".to_string(), "urls".to_string()]
            }
        );
    }

    #[test]
    fn test_plan_ignores_computed_and_write_only() {
        let prior = validate(&raw(minimal())).unwrap();
        let mut desired = prior.clone();
        desired.rule_type = "AccessRule".to_string();
        desired.comments = vec!["new comment".to_string()];
        assert_eq!(plan_change(&prior, &desired).unwrap(), PlannedChange::NoOp);
    }
}
