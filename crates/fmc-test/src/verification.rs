//! Verification helpers for remote state held by the in-memory FMC

use fmc_access_rule::{encode, AccessRule, AccessRuleRecord};
use thiserror::Error;

use crate::MemoryAccessRuleClient;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected access rule {acp}/{rule_id} not found")]
    RuleNotFound { acp: String, rule_id: String },

    #[error("Access rule {acp}/{rule_id} still exists")]
    RuleStillExists { acp: String, rule_id: String },

    #[error("Mismatch for {rule_id}.{field}: expected {expected}, got {actual}")]
    ValueMismatch {
        rule_id: String,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Expected {expected} stored rules, found {actual}")]
    RuleCountMismatch { expected: usize, actual: usize },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Remote state verification helper
pub struct RemoteVerifier<'a> {
    client: &'a MemoryAccessRuleClient,
}

impl<'a> RemoteVerifier<'a> {
    /// Create a new verifier over the in-memory FMC
    pub fn new(client: &'a MemoryAccessRuleClient) -> Self {
        Self { client }
    }

    fn stored(&self, acp: &str, rule_id: &str) -> VerifyResult<AccessRule> {
        self.client
            .stored(acp, rule_id)
            .ok_or_else(|| VerificationError::RuleNotFound {
                acp: acp.to_string(),
                rule_id: rule_id.to_string(),
            })
    }

    /// Verify that a rule exists remotely
    pub fn assert_rule_exists(&self, acp: &str, rule_id: &str) -> VerifyResult<()> {
        self.stored(acp, rule_id).map(|_| ())
    }

    /// Verify that a rule does not exist remotely
    pub fn assert_rule_absent(&self, acp: &str, rule_id: &str) -> VerifyResult<()> {
        match self.client.stored(acp, rule_id) {
            Some(_) => Err(VerificationError::RuleStillExists {
                acp: acp.to_string(),
                rule_id: rule_id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Verify the number of stored rules
    pub fn assert_rule_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.client.rule_count();
        if actual != expected {
            return Err(VerificationError::RuleCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Verify that the stored rule carries what `record` encodes to.
    ///
    /// Server-managed attributes (`id`, `type`) and write-only comments are
    /// not compared.
    pub fn assert_rule_matches(
        &self,
        acp: &str,
        rule_id: &str,
        record: &AccessRuleRecord,
    ) -> VerifyResult<()> {
        let stored = serde_json::to_value(self.stored(acp, rule_id)?).unwrap_or_default();
        let expected = serde_json::to_value(encode(record)).unwrap_or_default();

        let (Some(stored), Some(expected)) = (stored.as_object(), expected.as_object()) else {
            return Err(VerificationError::ValueMismatch {
                rule_id: rule_id.to_string(),
                field: "<body>".to_string(),
                expected: expected.to_string(),
                actual: stored.to_string(),
            });
        };

        for (field, want) in expected {
            if matches!(field.as_str(), "id" | "type" | "newComments") {
                continue;
            }
            let got = stored.get(field).cloned().unwrap_or_default();
            if &got != want {
                return Err(VerificationError::ValueMismatch {
                    rule_id: rule_id.to_string(),
                    field: field.clone(),
                    expected: want.to_string(),
                    actual: got.to_string(),
                });
            }
        }
        Ok(())
    }
}
