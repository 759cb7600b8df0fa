//! Declarative field names and wire constants.
//!
//! Field names are part of the host-facing surface and must not change.

pub const ACP: &str = "acp";
pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const ACTION: &str = "action";
pub const SYSLOG_SEVERITY: &str = "syslog_severity";
pub const ENABLE_SYSLOG: &str = "enable_syslog";
pub const ENABLED: &str = "enabled";
pub const SEND_EVENTS_TO_FMC: &str = "send_events_to_fmc";
pub const LOG_FILES: &str = "log_files";
pub const LOG_BEGIN: &str = "log_begin";
pub const LOG_END: &str = "log_end";

// Reference lists
pub const SOURCE_ZONES: &str = "source_zones";
pub const DESTINATION_ZONES: &str = "destination_zones";
pub const SOURCE_NETWORKS: &str = "source_networks";
pub const DESTINATION_NETWORKS: &str = "destination_networks";
pub const SOURCE_PORTS: &str = "source_ports";
pub const DESTINATION_PORTS: &str = "destination_ports";
pub const URLS: &str = "urls";

// Singular references
pub const IPS_POLICY: &str = "ips_policy";
pub const FILE_POLICY: &str = "file_policy";
pub const SYSLOG_CONFIG: &str = "syslog_config";

pub const COMMENTS: &str = "comments";

/// Summary carried by every access rule diagnostic.
pub const DIAG_SUMMARY: &str = "Error in access rule";
