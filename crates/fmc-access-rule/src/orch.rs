//! AccessRuleResource - lifecycle orchestration for a single access rule.
//!
//! The resource translates host lifecycle calls into remote client calls:
//! - Create: encode, create remotely, capture the identifier, re-read
//! - Read: fetch by (acp, id) and decode into the observed record
//! - Update: always refused
//! - Delete: delete remotely and clear the identifier
//!
//! Every failure becomes a single error diagnostic whose detail is the
//! underlying error text. Nothing is retried here.

use async_trait::async_trait;
use fmc_orch_common::{
    Diagnostic, Diagnostics, FmcError, FmcResult, Resource, ResourceData, SessionContext,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::client::{AccessRuleClient, ClientError};
use crate::codec::{decode_into, encode};
use crate::fields;
use crate::record::AccessRuleRecord;
use crate::schema::{validate, RawConfig, SchemaError};

/// What Read does when FMC reports the rule no longer exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRulePolicy {
    /// Surface the failure as an error diagnostic.
    #[default]
    Error,
    /// Clear the identifier so the host recreates the rule; report a warning.
    Forget,
}

/// Configuration for AccessRuleResource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessRuleResourceConfig {
    /// Handling of rules deleted out of band.
    pub missing_rule_policy: MissingRulePolicy,
    /// Summary carried by every diagnostic.
    pub summary: String,
}

impl Default for AccessRuleResourceConfig {
    fn default() -> Self {
        Self {
            missing_rule_policy: MissingRulePolicy::Error,
            summary: fields::DIAG_SUMMARY.to_string(),
        }
    }
}

/// Lifecycle orchestrator for FMC access rules.
///
/// Stateless apart from its client and configuration; the record being
/// operated on is passed in by the host on every call.
#[derive(Debug)]
pub struct AccessRuleResource<C> {
    client: C,
    config: AccessRuleResourceConfig,
}

impl<C: AccessRuleClient> AccessRuleResource<C> {
    /// Creates a resource with the default configuration.
    pub fn new(client: C) -> Self {
        Self::with_config(client, AccessRuleResourceConfig::default())
    }

    /// Creates a resource with the given configuration.
    pub fn with_config(client: C, config: AccessRuleResourceConfig) -> Self {
        Self { client, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AccessRuleResourceConfig {
        &self.config
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validates raw declarative input into an unmanaged record.
    ///
    /// Validation failures are returned as diagnostics and never reach the
    /// remote client.
    pub fn validate(&self, raw: &RawConfig) -> Result<ResourceData<AccessRuleRecord>, Diagnostics> {
        validate(raw)
            .map(ResourceData::new)
            .map_err(|errs| errs.to_diagnostics(&self.config.summary))
    }

    fn diag(&self, err: &dyn std::error::Error) -> Diagnostics {
        Diagnostic::from_error(self.config.summary.as_str(), err).into()
    }

    fn remote_failure(&self, op: &str, acp: &str, err: &ClientError) -> Diagnostics {
        error!(acp = %acp, error = %err, "Access rule {} failed", op);
        self.diag(err)
    }

    fn require_id(data: &ResourceData<AccessRuleRecord>) -> FmcResult<String> {
        data.id()
            .map(str::to_string)
            .ok_or_else(|| FmcError::unmanaged("access rule"))
    }

    fn require_acp(data: &ResourceData<AccessRuleRecord>) -> Result<String, SchemaError> {
        if data.record.acp.is_empty() {
            Err(SchemaError::MissingRequired {
                field: fields::ACP.to_string(),
            })
        } else {
            Ok(data.record.acp.clone())
        }
    }

    /// Resolves the (acp, id) key of a managed record.
    fn managed_key(&self, data: &ResourceData<AccessRuleRecord>) -> Result<(String, String), Diagnostics> {
        let acp = Self::require_acp(data).map_err(|e| self.diag(&e))?;
        let id = Self::require_id(data).map_err(|e| self.diag(&e))?;
        Ok((acp, id))
    }
}

#[async_trait]
impl<C: AccessRuleClient> Resource for AccessRuleResource<C> {
    type Record = AccessRuleRecord;

    fn type_name(&self) -> &str {
        "fmc_access_rules"
    }

    async fn create(
        &self,
        ctx: &SessionContext,
        data: &mut ResourceData<AccessRuleRecord>,
    ) -> Diagnostics {
        if let Some(id) = data.id() {
            return self.diag(&FmcError::internal(format!(
                "access rule is already managed as {}",
                id
            )));
        }
        let acp = match Self::require_acp(data) {
            Ok(acp) => acp,
            Err(e) => return self.diag(&e),
        };

        let body = encode(&data.record);
        info!(
            acp = %acp,
            session = %ctx.session_id,
            "Creating access rule {}",
            body.name
        );

        let created = match self.client.create_access_rule(ctx, &acp, &body).await {
            Ok(created) => created,
            Err(e) => return self.remote_failure("create", &acp, &e),
        };
        if created.id.is_empty() {
            return self.diag(&FmcError::internal(
                "FMC returned an access rule without an identifier",
            ));
        }

        info!(acp = %acp, rule_id = %created.id, "Created access rule {}", body.name);
        data.set_id(created.id);

        // Observed state comes from a fresh read, not the create response.
        self.read(ctx, data).await
    }

    async fn read(
        &self,
        ctx: &SessionContext,
        data: &mut ResourceData<AccessRuleRecord>,
    ) -> Diagnostics {
        let (acp, id) = match self.managed_key(data) {
            Ok(key) => key,
            Err(diags) => return diags,
        };

        match self.client.get_access_rule(ctx, &acp, &id).await {
            Ok(rule) => {
                decode_into(&rule, &mut data.record);
                debug!(acp = %acp, rule_id = %id, "Refreshed access rule {}", data.record.name);
                Diagnostics::new()
            }
            Err(e)
                if e.is_not_found()
                    && self.config.missing_rule_policy == MissingRulePolicy::Forget =>
            {
                warn!(acp = %acp, rule_id = %id, "Access rule removed out of band, forgetting it");
                data.clear_id();
                Diagnostic::warning(self.config.summary.as_str(), e.to_string()).into()
            }
            Err(e) => self.remote_failure("read", &acp, &e),
        }
    }

    async fn update(
        &self,
        _ctx: &SessionContext,
        data: &mut ResourceData<AccessRuleRecord>,
    ) -> Diagnostics {
        // TODO: map in-place changes onto a PUT once rule ordering is handled.
        debug!(rule_id = ?data.id(), "Refusing access rule update");
        self.diag(&FmcError::unsupported("update"))
    }

    async fn delete(
        &self,
        ctx: &SessionContext,
        data: &mut ResourceData<AccessRuleRecord>,
    ) -> Diagnostics {
        let (acp, id) = match self.managed_key(data) {
            Ok(key) => key,
            Err(diags) => return diags,
        };

        info!(acp = %acp, rule_id = %id, "Deleting access rule {}", data.record.name);
        match self.client.delete_access_rule(ctx, &acp, &id).await {
            Ok(()) => {
                data.clear_id();
                Diagnostics::new()
            }
            Err(e) => self.remote_failure("delete", &acp, &e),
        }
    }
}
