//! Access rule enumerations.
//!
//! Free-text enumerations accepted by FMC are represented as type-safe
//! enums. Parsing is case-insensitive; the canonical form is always upper
//! case, which is what gets transmitted and stored.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A value outside an enumerated allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field:?} must be in [{}], got: {value:?}", .allowed.join(" "))]
pub struct InvalidEnumValue {
    /// Field the value was supplied for.
    pub field: &'static str,
    /// Canonical allowed values.
    pub allowed: &'static [&'static str],
    /// Offending value, upper-cased.
    pub value: String,
}

/// Action applied to traffic matching an access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    /// Permit and inspect.
    Allow,
    /// Permit without further inspection.
    Trust,
    /// Drop silently.
    Block,
    /// Log only; evaluation continues.
    Monitor,
    /// Drop and reset the connection.
    BlockReset,
    /// Block with an interactive user override page.
    BlockInteractive,
    /// Block with reset and an interactive user override page.
    BlockResetInteractive,
}

impl RuleAction {
    /// Canonical spellings, in FMC order.
    pub const ALLOWED: &'static [&'static str] = &[
        "ALLOW",
        "TRUST",
        "BLOCK",
        "MONITOR",
        "BLOCK_RESET",
        "BLOCK_INTERACTIVE",
        "BLOCK_RESET_INTERACTIVE",
    ];

    /// Returns the canonical upper-case spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Trust => "TRUST",
            Self::Block => "BLOCK",
            Self::Monitor => "MONITOR",
            Self::BlockReset => "BLOCK_RESET",
            Self::BlockInteractive => "BLOCK_INTERACTIVE",
            Self::BlockResetInteractive => "BLOCK_RESET_INTERACTIVE",
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleAction {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, InvalidEnumValue> {
        match s.to_uppercase().as_str() {
            "ALLOW" => Ok(Self::Allow),
            "TRUST" => Ok(Self::Trust),
            "BLOCK" => Ok(Self::Block),
            "MONITOR" => Ok(Self::Monitor),
            "BLOCK_RESET" => Ok(Self::BlockReset),
            "BLOCK_INTERACTIVE" => Ok(Self::BlockInteractive),
            "BLOCK_RESET_INTERACTIVE" => Ok(Self::BlockResetInteractive),
            other => Err(InvalidEnumValue {
                field: crate::fields::ACTION,
                allowed: Self::ALLOWED,
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for RuleAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// Severity of syslog messages emitted for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyslogSeverity {
    Alert,
    Crit,
    Debug,
    Emerg,
    Err,
    Info,
    Notice,
    Warning,
}

impl SyslogSeverity {
    /// Canonical spellings, in FMC order.
    pub const ALLOWED: &'static [&'static str] = &[
        "ALERT", "CRIT", "DEBUG", "EMERG", "ERR", "INFO", "NOTICE", "WARNING",
    ];

    /// Returns the canonical upper-case spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "ALERT",
            Self::Crit => "CRIT",
            Self::Debug => "DEBUG",
            Self::Emerg => "EMERG",
            SyslogSeverity::Err => "ERR",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for SyslogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyslogSeverity {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, InvalidEnumValue> {
        match s.to_uppercase().as_str() {
            "ALERT" => Ok(Self::Alert),
            "CRIT" => Ok(Self::Crit),
            "DEBUG" => Ok(Self::Debug),
            "EMERG" => Ok(Self::Emerg),
            "ERR" => Ok(SyslogSeverity::Err),
            "INFO" => Ok(Self::Info),
            "NOTICE" => Ok(Self::Notice),
            "WARNING" => Ok(Self::Warning),
            other => Err(InvalidEnumValue {
                field: crate::fields::SYSLOG_SEVERITY,
                allowed: Self::ALLOWED,
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for SyslogSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_any_case() {
        for input in ["allow", "Allow", "ALLOW", "aLLoW"] {
            assert_eq!(input.parse::<RuleAction>(), Ok(RuleAction::Allow));
        }
        assert_eq!(
            "block_reset_interactive".parse::<RuleAction>(),
            Ok(RuleAction::BlockResetInteractive)
        );
    }

    #[test]
    fn test_action_roundtrip_all() {
        for name in RuleAction::ALLOWED {
            let action: RuleAction = name.parse().unwrap();
            assert_eq!(action.as_str(), *name);
            assert_eq!(action.to_string(), *name);
        }
    }

    #[test]
    fn test_action_rejects_unknown() {
        let err = "permit".parse::<RuleAction>().unwrap_err();
        assert_eq!(err.field, "action");
        assert_eq!(err.value, "PERMIT");
        assert_eq!(
            err.to_string(),
            "\"action\" must be in [ALLOW TRUST BLOCK MONITOR BLOCK_RESET \
             BLOCK_INTERACTIVE BLOCK_RESET_INTERACTIVE], got: \"PERMIT\""
        );
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("err".parse::<SyslogSeverity>(), Ok(SyslogSeverity::Err));
        assert_eq!("Warning".parse::<SyslogSeverity>(), Ok(SyslogSeverity::Warning));
        for name in SyslogSeverity::ALLOWED {
            assert_eq!(name.parse::<SyslogSeverity>().unwrap().as_str(), *name);
        }
    }

    #[test]
    fn test_severity_rejects_unknown() {
        let err = "critical".parse::<SyslogSeverity>().unwrap_err();
        assert_eq!(err.field, "syslog_severity");
        assert!(err.to_string().contains("got: \"CRITICAL\""));
    }

    #[test]
    fn test_serde_uses_canonical_spelling() {
        assert_eq!(
            serde_json::to_string(&RuleAction::BlockReset).unwrap(),
            "\"BLOCK_RESET\""
        );
        let sev: SyslogSeverity = serde_json::from_str("\"NOTICE\"").unwrap();
        assert_eq!(sev, SyslogSeverity::Notice);
    }

    #[test]
    fn test_deserialize_any_case() {
        let sev: SyslogSeverity = serde_json::from_str("\"err\"").unwrap();
        assert_eq!(sev, SyslogSeverity::Err);
        let action: RuleAction = serde_json::from_str("\"Block_Reset\"").unwrap();
        assert_eq!(action, RuleAction::BlockReset);

        let err = serde_json::from_str::<RuleAction>("\"permit\"").unwrap_err();
        assert!(err.to_string().contains("got: \"PERMIT\""));
    }
}
