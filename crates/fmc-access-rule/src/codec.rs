//! Mapping between the declarative record and the FMC wire shape.
//!
//! Reference fields are described once, in [`REFERENCE_LIST_FIELDS`] and
//! [`SINGULAR_REFERENCE_FIELDS`]; both [`encode`] and [`decode_into`] walk
//! those tables, so adding a reference field means adding one table entry.

use crate::fields;
use crate::record::AccessRuleRecord;
use crate::wire::{AccessRule, ObjectReference, ObjectReferences};

/// Discriminator sent with every access rule.
pub const ACCESS_RULE_TYPE: &str = "AccessRule";

/// Accessors binding a list-of-identifiers field to its reference collection.
pub struct ReferenceListField {
    /// Declarative field name.
    pub name: &'static str,
    pub record: fn(&AccessRuleRecord) -> &Vec<String>,
    pub record_mut: fn(&mut AccessRuleRecord) -> &mut Vec<String>,
    pub wire: fn(&AccessRule) -> &ObjectReferences,
    pub wire_mut: fn(&mut AccessRule) -> &mut ObjectReferences,
}

/// Accessors binding an identifier field to its single reference.
pub struct SingularReferenceField {
    /// Declarative field name.
    pub name: &'static str,
    pub record: fn(&AccessRuleRecord) -> &String,
    pub record_mut: fn(&mut AccessRuleRecord) -> &mut String,
    pub wire: fn(&AccessRule) -> &Option<ObjectReference>,
    pub wire_mut: fn(&mut AccessRule) -> &mut Option<ObjectReference>,
}

/// Ordered reference-list fields.
pub static REFERENCE_LIST_FIELDS: [ReferenceListField; 7] = [
    ReferenceListField {
        name: fields::SOURCE_ZONES,
        record: |r| &r.source_zones,
        record_mut: |r| &mut r.source_zones,
        wire: |w| &w.source_zones,
        wire_mut: |w| &mut w.source_zones,
    },
    ReferenceListField {
        name: fields::DESTINATION_ZONES,
        record: |r| &r.destination_zones,
        record_mut: |r| &mut r.destination_zones,
        wire: |w| &w.destination_zones,
        wire_mut: |w| &mut w.destination_zones,
    },
    ReferenceListField {
        name: fields::SOURCE_NETWORKS,
        record: |r| &r.source_networks,
        record_mut: |r| &mut r.source_networks,
        wire: |w| &w.source_networks,
        wire_mut: |w| &mut w.source_networks,
    },
    ReferenceListField {
        name: fields::DESTINATION_NETWORKS,
        record: |r| &r.destination_networks,
        record_mut: |r| &mut r.destination_networks,
        wire: |w| &w.destination_networks,
        wire_mut: |w| &mut w.destination_networks,
    },
    ReferenceListField {
        name: fields::SOURCE_PORTS,
        record: |r| &r.source_ports,
        record_mut: |r| &mut r.source_ports,
        wire: |w| &w.source_ports,
        wire_mut: |w| &mut w.source_ports,
    },
    ReferenceListField {
        name: fields::DESTINATION_PORTS,
        record: |r| &r.destination_ports,
        record_mut: |r| &mut r.destination_ports,
        wire: |w| &w.destination_ports,
        wire_mut: |w| &mut w.destination_ports,
    },
    ReferenceListField {
        name: fields::URLS,
        record: |r| &r.urls,
        record_mut: |r| &mut r.urls,
        wire: |w| &w.urls,
        wire_mut: |w| &mut w.urls,
    },
];

/// Single-reference fields.
pub static SINGULAR_REFERENCE_FIELDS: [SingularReferenceField; 3] = [
    SingularReferenceField {
        name: fields::IPS_POLICY,
        record: |r| &r.ips_policy,
        record_mut: |r| &mut r.ips_policy,
        wire: |w| &w.ips_policy,
        wire_mut: |w| &mut w.ips_policy,
    },
    SingularReferenceField {
        name: fields::FILE_POLICY,
        record: |r| &r.file_policy,
        record_mut: |r| &mut r.file_policy,
        wire: |w| &w.file_policy,
        wire_mut: |w| &mut w.file_policy,
    },
    SingularReferenceField {
        name: fields::SYSLOG_CONFIG,
        record: |r| &r.syslog_config,
        record_mut: |r| &mut r.syslog_config,
        wire: |w| &w.syslog_config,
        wire_mut: |w| &mut w.syslog_config,
    },
];

/// Encodes a validated record into an FMC create body.
///
/// - `type` is always [`ACCESS_RULE_TYPE`], whatever the record holds
/// - reference lists become id-only references, order and duplicates kept
/// - singular references are always sent; an empty identifier is sent as
///   `{"id": ""}` so FMC clears the reference instead of ignoring it
/// - comments go to `newComments`
pub fn encode(record: &AccessRuleRecord) -> AccessRule {
    let mut rule = AccessRule {
        id: String::new(),
        name: record.name.clone(),
        kind: ACCESS_RULE_TYPE.to_string(),
        action: record.action,
        syslog_severity: record.syslog_severity,
        enable_syslog: record.enable_syslog,
        enabled: record.enabled,
        send_events_to_fmc: record.send_events_to_fmc,
        log_files: record.log_files,
        log_begin: record.log_begin,
        log_end: record.log_end,
        new_comments: record.comments.clone(),
        ..Default::default()
    };

    for field in &REFERENCE_LIST_FIELDS {
        *(field.wire_mut)(&mut rule) = ObjectReferences::from_ids((field.record)(record));
    }
    for field in &SINGULAR_REFERENCE_FIELDS {
        *(field.wire_mut)(&mut rule) = Some(ObjectReference::new((field.record)(record).as_str()));
    }

    rule
}

/// Decodes an FMC access rule into a fresh record.
///
/// `acp` and `comments` are not part of the remote object and stay empty.
pub fn decode(rule: &AccessRule) -> AccessRuleRecord {
    let mut record = AccessRuleRecord::default();
    decode_into(rule, &mut record);
    record
}

/// Overwrites every observed field of `record` from `rule`.
///
/// `acp` (not returned by FMC) and `comments` (write-only) are left as they
/// are. Missing collections decode to empty lists and missing references to
/// empty identifiers, so repeated reads are stable.
pub fn decode_into(rule: &AccessRule, record: &mut AccessRuleRecord) {
    record.name = rule.name.clone();
    record.rule_type = rule.kind.clone();
    record.action = rule.action;
    record.syslog_severity = rule.syslog_severity;
    record.enable_syslog = rule.enable_syslog;
    record.enabled = rule.enabled;
    record.send_events_to_fmc = rule.send_events_to_fmc;
    record.log_files = rule.log_files;
    record.log_begin = rule.log_begin;
    record.log_end = rule.log_end;

    for field in &REFERENCE_LIST_FIELDS {
        *(field.record_mut)(record) = (field.wire)(rule).ids();
    }
    for field in &SINGULAR_REFERENCE_FIELDS {
        *(field.record_mut)(record) = (field.wire)(rule)
            .as_ref()
            .map(|r| r.id.clone())
            .unwrap_or_default();
    }
}
