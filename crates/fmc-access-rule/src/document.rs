//! Loading declarative rule documents and saved state from disk.
//!
//! Rule documents are JSON or YAML objects whose keys are the declarative
//! field names. The format is chosen by file extension (`.yaml`/`.yml` →
//! YAML, anything else → JSON).

use std::fs;
use std::path::{Path, PathBuf};

use fmc_orch_common::ResourceData;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::record::AccessRuleRecord;
use crate::schema::RawConfig;

/// Result type alias for document loading.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON / YAML, or has the wrong shape.
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// The file path.
        path: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// The document is valid but not an object of fields.
    #[error("{path} does not contain an object of rule fields")]
    NotAnObject {
        /// The file path.
        path: PathBuf,
    },
}

/// Saved observed state of one rule: identifier plus record fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub record: AccessRuleRecord,
}

impl StateDocument {
    /// Converts into the host's observed-state sink.
    pub fn into_resource_data(self) -> ResourceData<AccessRuleRecord> {
        match self.id {
            Some(id) => ResourceData::with_id(id, self.record),
            None => ResourceData::new(self.record),
        }
    }

    /// Captures a sink's current state.
    pub fn from_resource_data(data: &ResourceData<AccessRuleRecord>) -> Self {
        Self {
            id: data.id().map(str::to_string),
            record: data.record.clone(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse_value(path: &Path, text: &str) -> DocumentResult<Value> {
    let parsed = if is_yaml(path) {
        serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(text).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| DocumentError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn read(path: &Path) -> DocumentResult<String> {
    fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a declarative rule document as raw (unvalidated) fields.
pub fn load_rule_document(path: &Path) -> DocumentResult<RawConfig> {
    let text = read(path)?;
    match parse_value(path, &text)? {
        Value::Object(map) => {
            debug!("Loaded {} rule fields from {}", map.len(), path.display());
            Ok(map)
        }
        _ => Err(DocumentError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Loads a saved state document.
pub fn load_state_document(path: &Path) -> DocumentResult<StateDocument> {
    let text = read(path)?;
    let value = parse_value(path, &text)?;
    serde_json::from_value(value).map_err(|e| DocumentError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleAction;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_json_rule() {
        let file = write_temp(
            ".json",
            r#"{ "acp": "p1", "name": "r1", "source_zones": ["z1"] }"#,
        );
        let raw = load_rule_document(file.path()).unwrap();
        assert_eq!(raw["acp"], "p1");
        assert_eq!(raw["source_zones"][0], "z1");
    }

    #[test]
    fn test_load_yaml_rule() {
        let file = write_temp(
            ".yaml",
            "acp: p1\nname: r1\nenabled: true\nurls:\n  - u1\n  - u2\n",
        );
        let raw = load_rule_document(file.path()).unwrap();
        assert_eq!(raw["enabled"], true);
        assert_eq!(raw["urls"], serde_json::json!(["u1", "u2"]));
    }

    #[test]
    fn test_load_rule_not_object() {
        let file = write_temp(".json", "[1, 2]");
        let err = load_rule_document(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject { .. }));
    }

    #[test]
    fn test_load_rule_missing_file() {
        let err = load_rule_document(Path::new("/nonexistent/rule.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/rule.json"));
    }

    #[test]
    fn test_load_rule_parse_error() {
        let file = write_temp(".json", "{ not json");
        let err = load_rule_document(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn test_load_state_document() {
        let file = write_temp(
            ".json",
            r#"{ "id": "id-123", "acp": "p1", "name": "r1", "action": "ALLOW" }"#,
        );
        let state = load_state_document(file.path()).unwrap();
        let data = state.clone().into_resource_data();
        assert_eq!(data.id(), Some("id-123"));
        assert_eq!(data.record.action, Some(RuleAction::Allow));
        assert_eq!(StateDocument::from_resource_data(&data), state);
    }
}
