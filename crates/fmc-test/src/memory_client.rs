//! In-memory FMC standing in for the remote policy client.
//!
//! Behaves like FMC where it matters for reconciliation:
//! - assigns identifiers on create
//! - drops `newComments` (write-only) from the stored rule
//! - defaults `type` to "AccessRule" when the body leaves it empty
//! - returns references decorated with `name` and `type` attributes
//! - answers unknown (acp, id) pairs with `NotFound`
//!
//! Failures can be injected per operation, and per-call latency can be set
//! to exercise the session timeout.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use fmc_access_rule::{
    AccessRule, AccessRuleClient, ClientError, ClientResult, ObjectReferences, ACCESS_RULE_TYPE,
};
use fmc_orch_common::SessionContext;
use tracing::debug;

/// Remote operation kinds, for call logs and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    Delete,
}

/// One call received by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub op: Operation,
    pub acp: String,
    /// Rule identifier (empty for create).
    pub rule_id: String,
}

#[derive(Debug, Default)]
struct State {
    rules: HashMap<(String, String), AccessRule>,
    next_ids: VecDeque<String>,
    counter: u64,
    failures: HashMap<Operation, VecDeque<ClientError>>,
    calls: Vec<RecordedCall>,
    latency: Option<Duration>,
}

/// Reflecting in-memory access rule store.
#[derive(Debug, Default)]
pub struct MemoryAccessRuleClient {
    state: Mutex<State>,
}

impl MemoryAccessRuleClient {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Poisoning is ignored; the store stays usable after a panicking test.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queues identifiers to hand out on the next creates, in order.
    /// Once exhausted, identifiers fall back to `rule-<n>`.
    pub fn with_next_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().next_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Delays every call by `latency` before answering.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = Some(latency);
        self
    }

    /// Makes the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: Operation, err: ClientError) {
        self.lock().failures.entry(op).or_default().push_back(err);
    }

    /// Removes a rule behind the resource's back.
    pub fn remove_out_of_band(&self, acp: &str, rule_id: &str) -> Option<AccessRule> {
        self.lock()
            .rules
            .remove(&(acp.to_string(), rule_id.to_string()))
    }

    /// Returns the rule as stored (without read-time decoration).
    pub fn stored(&self, acp: &str, rule_id: &str) -> Option<AccessRule> {
        self.lock()
            .rules
            .get(&(acp.to_string(), rule_id.to_string()))
            .cloned()
    }

    /// Returns the number of stored rules across all policies.
    pub fn rule_count(&self) -> usize {
        self.lock().rules.len()
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Returns the number of calls of the given kind.
    pub fn call_count(&self, op: Operation) -> usize {
        self.lock().calls.iter().filter(|c| c.op == op).count()
    }

    /// Records the call, applies latency/timeout, and pops an injected failure.
    async fn enter(
        &self,
        ctx: &SessionContext,
        op: Operation,
        acp: &str,
        rule_id: &str,
    ) -> ClientResult<()> {
        let latency = {
            let mut state = self.lock();
            state.calls.push(RecordedCall {
                op,
                acp: acp.to_string(),
                rule_id: rule_id.to_string(),
            });
            state.latency
        };

        if let Some(latency) = latency {
            let sleep = tokio::time::sleep(latency);
            match ctx.timeout {
                Some(timeout) => tokio::time::timeout(timeout, sleep).await.map_err(|_| {
                    ClientError::cancelled(format!("deadline of {:?} exceeded", timeout))
                })?,
                None => sleep.await,
            }
        }

        match self.lock().failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Adds the descriptive attributes FMC returns on read.
fn decorate(refs: &mut ObjectReferences, kind: &str) {
    for obj in &mut refs.objects {
        obj.name = Some(format!("{}-name", obj.id));
        obj.kind = Some(kind.to_string());
    }
}

fn as_returned(rule: &AccessRule) -> AccessRule {
    let mut out = rule.clone();
    decorate(&mut out.source_zones, "SecurityZone");
    decorate(&mut out.destination_zones, "SecurityZone");
    decorate(&mut out.source_networks, "Network");
    decorate(&mut out.destination_networks, "Network");
    decorate(&mut out.source_ports, "ProtocolPortObject");
    decorate(&mut out.destination_ports, "ProtocolPortObject");
    decorate(&mut out.urls, "Url");
    for single in [&mut out.ips_policy, &mut out.file_policy, &mut out.syslog_config] {
        // FMC omits cleared references.
        if single.as_ref().is_some_and(|r| r.is_empty()) {
            *single = None;
        }
    }
    out
}

#[async_trait]
impl AccessRuleClient for MemoryAccessRuleClient {
    async fn create_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule: &AccessRule,
    ) -> ClientResult<AccessRule> {
        self.enter(ctx, Operation::Create, acp_id, "").await?;

        let mut state = self.lock();
        let id = match state.next_ids.pop_front() {
            Some(id) => id,
            None => {
                state.counter += 1;
                format!("rule-{}", state.counter)
            }
        };

        let mut stored = rule.clone();
        stored.id = id.clone();
        stored.new_comments.clear();
        if stored.kind.is_empty() {
            stored.kind = ACCESS_RULE_TYPE.to_string();
        }

        debug!(acp = %acp_id, rule_id = %id, "memory FMC: created rule {}", stored.name);
        state.rules.insert((acp_id.to_string(), id), stored.clone());
        Ok(as_returned(&stored))
    }

    async fn get_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule_id: &str,
    ) -> ClientResult<AccessRule> {
        self.enter(ctx, Operation::Get, acp_id, rule_id).await?;

        self.lock()
            .rules
            .get(&(acp_id.to_string(), rule_id.to_string()))
            .map(as_returned)
            .ok_or_else(|| ClientError::not_found(acp_id, rule_id))
    }

    async fn delete_access_rule(
        &self,
        ctx: &SessionContext,
        acp_id: &str,
        rule_id: &str,
    ) -> ClientResult<()> {
        self.enter(ctx, Operation::Delete, acp_id, rule_id).await?;

        match self
            .lock()
            .rules
            .remove(&(acp_id.to_string(), rule_id.to_string()))
        {
            Some(_) => Ok(()),
            None => Err(ClientError::not_found(acp_id, rule_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmc_access_rule::ObjectReference;

    fn body(name: &str) -> AccessRule {
        AccessRule {
            name: name.to_string(),
            source_zones: ObjectReferences::from_ids(&["z1"]),
            file_policy: Some(ObjectReference::new("")),
            new_comments: vec!["hello".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_assigns_queued_then_counter_ids() {
        let client = MemoryAccessRuleClient::new().with_next_ids(["id-123"]);
        let ctx = SessionContext::default();

        let first = client.create_access_rule(&ctx, "p1", &body("a")).await.unwrap();
        let second = client.create_access_rule(&ctx, "p1", &body("b")).await.unwrap();
        assert_eq!(first.id, "id-123");
        assert_eq!(second.id, "rule-1");
        assert_eq!(client.rule_count(), 2);
    }

    #[tokio::test]
    async fn test_stored_rule_is_normalized_server_side() {
        let client = MemoryAccessRuleClient::new();
        let ctx = SessionContext::default();
        let created = client.create_access_rule(&ctx, "p1", &body("a")).await.unwrap();

        let stored = client.stored("p1", &created.id).unwrap();
        assert_eq!(stored.kind, "AccessRule");
        assert!(stored.new_comments.is_empty());

        let fetched = client.get_access_rule(&ctx, "p1", &created.id).await.unwrap();
        assert_eq!(fetched.source_zones.objects[0].name.as_deref(), Some("z1-name"));
        assert_eq!(fetched.file_policy, None);
    }

    #[tokio::test]
    async fn test_rules_are_scoped_by_policy() {
        let client = MemoryAccessRuleClient::new();
        let ctx = SessionContext::default();
        let created = client.create_access_rule(&ctx, "p1", &body("a")).await.unwrap();

        let err = client.get_access_rule(&ctx, "p2", &created.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let client = MemoryAccessRuleClient::new();
        let ctx = SessionContext::default();
        client.fail_next(Operation::Create, ClientError::rejected(500, "boom"));

        assert!(client.create_access_rule(&ctx, "p1", &body("a")).await.is_err());
        assert!(client.create_access_rule(&ctx, "p1", &body("a")).await.is_ok());
        assert_eq!(client.call_count(Operation::Create), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_beyond_timeout_cancels() {
        let client = MemoryAccessRuleClient::new().with_latency(Duration::from_secs(30));
        let ctx = SessionContext::new("slow").with_timeout(Duration::from_secs(1));

        let err = client.create_access_rule(&ctx, "p1", &body("a")).await.unwrap_err();
        assert!(matches!(err, ClientError::Cancelled { .. }));
        assert_eq!(client.rule_count(), 0);
    }
}
