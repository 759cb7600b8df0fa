//! Remote policy client contract.
//!
//! Transport, authentication, retries and rate limiting live behind this
//! trait. The resource only needs create, get and delete; there is
//! deliberately no update call.

use std::sync::Arc;

use async_trait::async_trait;
use fmc_orch_common::SessionContext;
use thiserror::Error;

use crate::wire::AccessRule;

/// Result type alias for remote client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures reported by the remote policy client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The rule (or its policy) does not exist.
    #[error("access rule {rule_id} not found in policy {acp}")]
    NotFound {
        /// Owning policy identifier.
        acp: String,
        /// Rule identifier.
        rule_id: String,
    },

    /// FMC answered with an error status.
    #[error("FMC rejected the request (status {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error description returned by FMC.
        message: String,
    },

    /// The request never produced a response.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The call was cancelled or timed out.
    #[error("request cancelled: {reason}")]
    Cancelled {
        /// Why the call was abandoned.
        reason: String,
    },

    /// The response could not be interpreted.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl ClientError {
    /// Creates a not-found error.
    pub fn not_found(acp: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self::NotFound {
            acp: acp.into(),
            rule_id: rule_id.into(),
        }
    }

    /// Creates a rejected-request error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a cancellation error.
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
    }

    /// Returns true if the remote object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. }) || matches!(self, Self::Rejected { status: 404, .. })
    }
}

/// Access rule operations of the remote policy client.
///
/// Every call is scoped by the owning access control policy. Implementations
/// own timeouts and cancellation; a cancelled call must surface as an error.
#[async_trait]
pub trait AccessRuleClient: Send + Sync {
    /// Creates a rule and returns it with its assigned identifier.
    async fn create_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule: &AccessRule,
    ) -> ClientResult<AccessRule>;

    /// Fetches a rule by identifier.
    async fn get_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule_id: &str,
    ) -> ClientResult<AccessRule>;

    /// Deletes a rule by identifier.
    async fn delete_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule_id: &str,
    ) -> ClientResult<()>;
}

#[async_trait]
impl<C: AccessRuleClient + ?Sized> AccessRuleClient for Arc<C> {
    async fn create_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule: &AccessRule,
    ) -> ClientResult<AccessRule> {
        (**self).create_access_rule(ctx, acp_id, rule).await
    }

    async fn get_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule_id: &str,
    ) -> ClientResult<AccessRule> {
        (**self).get_access_rule(ctx, acp_id, rule_id).await
    }

    async fn delete_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule_id: &str,
    ) -> ClientResult<()> {
        (**self).delete_access_rule(ctx, acp_id, rule_id).await
    }
}
